//! Registration, login and the inventory screen against an in-memory
//! database.

use pricepal_app::commands::{auth, inventory};
use pricepal_app::error::ErrorCode;
use pricepal_app::state::{InventoryState, SessionState};
use pricepal_core::{UserProfile, SHOPS_COLLECTION, USERS_COLLECTION};
use pricepal_db::{Database, DbConfig};

async fn setup() -> (Database, SessionState, InventoryState) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    (db, SessionState::new(), InventoryState::new())
}

#[tokio::test]
async fn test_register_writes_profile_and_logs_in() {
    let (db, session, inventory) = setup().await;

    let user = auth::register(&db, &session, &inventory, "Owner@Shop.com", "secret1", " Corner Store ")
        .await
        .unwrap();
    assert_eq!(user.email, "owner@shop.com");
    assert_eq!(session.current().await, Some(user.clone()));

    let document = db
        .documents()
        .fetch(USERS_COLLECTION, &user.uid)
        .await
        .unwrap()
        .unwrap();
    let profile = UserProfile::from_document(&document).unwrap();
    assert_eq!(profile.shop_name, "Corner Store");
    assert_eq!(profile.email, "owner@shop.com");
}

#[tokio::test]
async fn test_register_rejects_bad_input_and_duplicates() {
    let (db, session, inventory) = setup().await;

    let err = auth::register(&db, &session, &inventory, "not-an-email", "secret1", "Shop")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = auth::register(&db, &session, &inventory, "a@b.co", "12345", "Shop")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let err = auth::register(&db, &session, &inventory, "a@b.co", "secret1", "   ")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(session.current().await, None);

    auth::register(&db, &session, &inventory, "a@b.co", "secret1", "Shop")
        .await
        .unwrap();
    let err = auth::register(&db, &session, &inventory, "A@B.CO", "secret2", "Other")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailInUse);
}

#[tokio::test]
async fn test_logout_then_login() {
    let (db, session, inventory) = setup().await;
    let registered = auth::register(&db, &session, &inventory, "a@b.co", "secret1", "Shop")
        .await
        .unwrap();

    auth::logout(&session, &inventory).await;
    assert_eq!(session.current().await, None);

    let err = auth::login(&db, &session, &inventory, "a@b.co", "wrong-password")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredentials);

    let err = auth::login(&db, &session, &inventory, "nobody@b.co", "secret1")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredentials);

    let err = auth::login(&db, &session, &inventory, "a@b.co", "").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    let user = auth::login(&db, &session, &inventory, "a@b.co", "secret1").await.unwrap();
    assert_eq!(user.uid, registered.uid);
}

#[tokio::test]
async fn test_password_reset() {
    let (db, session, inventory) = setup().await;
    let user = auth::register(&db, &session, &inventory, "a@b.co", "secret1", "Shop")
        .await
        .unwrap();

    auth::send_password_reset(&db, "a@b.co").await.unwrap();
    assert_eq!(db.accounts().pending_resets(&user.uid).await.unwrap(), 1);

    let err = auth::send_password_reset(&db, "nobody@b.co")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_inventory_requires_login() {
    let (db, session, inventory) = setup().await;

    let err = inventory::fetch_items(&db, &session, &inventory)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotLoggedIn);
}

#[tokio::test]
async fn test_add_fetch_and_remove_items() {
    let (db, session, inv) = setup().await;
    auth::register(&db, &session, &inv, "a@b.co", "secret1", "Corner Store")
        .await
        .unwrap();

    assert_eq!(
        inventory::fetch_shop_name(&db, &session, &inv).await.unwrap(),
        "Corner Store"
    );
    assert!(inventory::fetch_items(&db, &session, &inv)
        .await
        .unwrap()
        .is_empty());

    inventory::add_item(&db, &session, &inv, "5449000000996", "Cola 330ml", "0.85")
        .await
        .unwrap();
    let items = inventory::add_item(&db, &session, &inv, "012345678905", "Milk", "1.29")
        .await
        .unwrap();

    let barcodes: Vec<&str> = items.iter().map(|item| item.barcode.as_str()).collect();
    assert_eq!(barcodes, vec!["012345678905", "5449000000996"]);
    assert_eq!(items[0].item_name, "Milk");
    assert_eq!(items[0].item_price, "1.29");

    // Same barcode replaces the record.
    let items = inventory::add_item(&db, &session, &inv, "012345678905", "Milk 1L", "1.35")
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].item_price, "1.35");

    inventory::remove_item(&db, &session, &inv, "5449000000996")
        .await
        .unwrap();
    let snapshot = inv.snapshot().await;
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.shop_name.as_deref(), Some("Corner Store"));

    let items = inventory::fetch_items(&db, &session, &inv).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].barcode, "012345678905");
}

#[tokio::test]
async fn test_add_item_validation() {
    let (db, session, inv) = setup().await;
    auth::register(&db, &session, &inv, "a@b.co", "secret1", "Shop")
        .await
        .unwrap();

    for (barcode, name, price) in [
        ("", "Milk", "1.29"),
        ("0123 4567", "Milk", "1.29"),
        ("012345678905", "  ", "1.29"),
        ("012345678905", "Milk", "cheap"),
        ("012345678905", "Milk", "-1"),
    ] {
        let err = inventory::add_item(&db, &session, &inv, barcode, name, price)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError, "{barcode:?} {name:?} {price:?}");
    }

    assert!(inventory::fetch_items(&db, &session, &inv)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_switching_accounts_uses_new_shop() {
    let (db, session, inventory) = setup().await;

    auth::register(&db, &session, &inventory, "alpha@shop.com", "secret1", "Alpha")
        .await
        .unwrap();
    assert!(inventory::fetch_items(&db, &session, &inventory)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(inventory.shop_name().await.as_deref(), Some("Alpha"));

    auth::register(&db, &session, &inventory, "beta@shop.com", "secret1", "Beta")
        .await
        .unwrap();
    assert_eq!(inventory.shop_name().await, None);

    inventory::add_item(&db, &session, &inventory, "111", "Tea", "2.50")
        .await
        .unwrap();

    let beta = db.documents().fetch(SHOPS_COLLECTION, "Beta").await.unwrap().unwrap();
    assert!(beta.contains_key("111"));
    let alpha = db.documents().fetch(SHOPS_COLLECTION, "Alpha").await.unwrap();
    assert!(alpha.map_or(true, |doc| !doc.contains_key("111")));

    // Logging back in as the first user switches the shop back too.
    auth::login(&db, &session, &inventory, "alpha@shop.com", "secret1")
        .await
        .unwrap();
    inventory::add_item(&db, &session, &inventory, "222", "Coffee", "3.10")
        .await
        .unwrap();

    let alpha = db.documents().fetch(SHOPS_COLLECTION, "Alpha").await.unwrap().unwrap();
    assert!(alpha.contains_key("222"));
    let beta = db.documents().fetch(SHOPS_COLLECTION, "Beta").await.unwrap().unwrap();
    assert!(!beta.contains_key("222"));
}
