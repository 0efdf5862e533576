use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = orderflow_api::app::build_app();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    sku: &str,
    unit_price: u64,
    available_quantity: u32,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/products", base_url))
        .json(&json!({
            "sku": sku,
            "name": format!("Product {}", sku),
            "description": "test product",
            "unit_price": unit_price,
            "available_quantity": available_quantity,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn create_order(client: &reqwest::Client, base_url: &str) -> serde_json::Value {
    let res = client
        .post(format!("{}/orders", base_url))
        .json(&json!({
            "customer_id": Uuid::now_v7(),
            "currency_code": "EUR",
            "street_address": "1 Main St",
            "postal_code": "10115",
            "city": "Berlin",
            "country": "DE",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

async fn get_product(
    client: &reqwest::Client,
    base_url: &str,
    product_id: &str,
) -> serde_json::Value {
    let res = client
        .get(format!("{}/products/{}", base_url, product_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let srv = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn full_order_lifecycle_over_http() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, "SKU-100", 500, 10).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let order = create_order(&client, &srv.base_url).await;
    let order_id = order["id"].as_str().unwrap().to_string();
    assert_eq!(order["status"], "draft");
    assert_eq!(order["total_amount"], 0);

    // Add two units; the reservation and the total move together.
    let res = client
        .post(format!("{}/orders/{}/items", srv.base_url, order_id))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let item: serde_json::Value = res.json().await.unwrap();
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["amount"], 1000);

    let product = get_product(&client, &srv.base_url, &product_id).await;
    assert_eq!(product["available_quantity"], 8);
    assert_eq!(product["reserved_quantity"], 2);
    assert_eq!(product["on_hand_quantity"], 10);

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["total_amount"], 1000);
    assert_eq!(order["items"].as_array().unwrap().len(), 1);

    let res = client
        .post(format!("{}/orders/{}/pay", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["status"], "paid");
    assert!(order["payment_date"].is_string());

    // Items are frozen once the order leaves draft.
    let res = client
        .post(format!("{}/orders/{}/items", srv.base_url, order_id))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "OrderAlreadyPaid");

    let res = client
        .post(format!("{}/orders/{}/ship", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["status"], "shipped");

    // Shipping released the reservation without touching availability.
    let product = get_product(&client, &srv.base_url, &product_id).await;
    assert_eq!(product["available_quantity"], 8);
    assert_eq!(product["reserved_quantity"], 0);
    assert_eq!(product["on_hand_quantity"], 8);

    let res = client
        .post(format!("{}/orders/{}/deliver", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["status"], "delivered");
}

#[tokio::test]
async fn item_quantity_update_and_removal() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, "SKU-200", 250, 20).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let order = create_order(&client, &srv.base_url).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders/{}/items", srv.base_url, order_id))
        .json(&json!({ "product_id": product_id, "quantity": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let item: serde_json::Value = res.json().await.unwrap();
    let item_id = item["id"].as_str().unwrap().to_string();

    let res = client
        .put(format!(
            "{}/orders/{}/items/{}",
            srv.base_url, order_id, item_id
        ))
        .json(&json!({ "quantity": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let product = get_product(&client, &srv.base_url, &product_id).await;
    assert_eq!(product["available_quantity"], 13);
    assert_eq!(product["reserved_quantity"], 7);

    // Quantity zero removes the item entirely.
    let res = client
        .put(format!(
            "{}/orders/{}/items/{}",
            srv.base_url, order_id, item_id
        ))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let product = get_product(&client, &srv.base_url, &product_id).await;
    assert_eq!(product["available_quantity"], 20);
    assert_eq!(product["reserved_quantity"], 0);

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["total_amount"], 0);
    assert!(order["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn over_reservation_is_a_conflict() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, "SKU-300", 100, 3).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let order = create_order(&client, &srv.base_url).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders/{}/items", srv.base_url, order_id))
        .json(&json!({ "product_id": product_id, "quantity": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "ProductQuantityNotAvailable");

    // The failed reservation left stock untouched.
    let product = get_product(&client, &srv.base_url, &product_id).await;
    assert_eq!(product["available_quantity"], 3);
    assert_eq!(product["reserved_quantity"], 0);
}

#[tokio::test]
async fn paying_requires_a_complete_shipping_address() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, "SKU-400", 100, 5).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({
            "customer_id": Uuid::now_v7(),
            "currency_code": "EUR",
            "street_address": "1 Main St",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: serde_json::Value = res.json().await.unwrap();
    let order_id = order["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders/{}/items", srv.base_url, order_id))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .post(format!("{}/orders/{}/pay", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "ShippingAddressMissing");

    // Complete the address and retry.
    let res = client
        .put(format!("{}/orders/{}", srv.base_url, order_id))
        .json(&json!({
            "street_address": "1 Main St",
            "postal_code": "10115",
            "city": "Berlin",
            "country": "DE",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/orders/{}/pay", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn paying_an_empty_order_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let order = create_order(&client, &srv.base_url).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders/{}/pay", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "NoOrderItemAvailableToPay");
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, Uuid::now_v7()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "OrderNotFound");
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/orders/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");
}

#[tokio::test]
async fn cancelled_order_rejects_everything_including_cancel() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let order = create_order(&client, &srv.base_url).await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders/{}/cancel", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: serde_json::Value = res.json().await.unwrap();
    assert_eq!(order["status"], "cancelled");

    for action in ["pay", "ship", "deliver", "cancel"] {
        let res = client
            .post(format!("{}/orders/{}/{}", srv.base_url, order_id, action))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CONFLICT, "action {}", action);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["error"], "OrderAlreadyCancelled");
    }
}

#[tokio::test]
async fn deactivated_products_disappear_from_lookups_and_listing() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, "SKU-500", 100, 5).await;
    let product_id = product["id"].as_str().unwrap().to_string();
    create_product(&client, &srv.base_url, "SKU-600", 100, 5).await;

    let res = client
        .post(format!("{}/products/{}/deactivate", srv.base_url, product_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/products/{}", srv.base_url, product_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "SKU-600");
}
