//! Camera to screen: frames pushed into the simulated camera come out as
//! looked-up prices on the scanner screen.

use std::sync::Arc;
use std::time::Duration;

use pricepal_app::commands::scanner;
use pricepal_app::state::ScannerScreen;
use pricepal_core::{ItemRecord, ScanResult, SHOPS_COLLECTION};
use pricepal_db::{Database, DbConfig, Document};
use pricepal_scanner::{
    scan_channel, CaptureSession, CodeType, MetadataObject, ReportPolicy, SilentFeedback,
    SimulatedCamera, SimulatedCameraHandle,
};
use tokio::time::{sleep, timeout, Instant};

const MILK: &str = "012345678905";
const PEN: &str = "4006381333931";

async fn seeded_db() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let mut corner = Document::new();
    corner.insert(MILK.into(), ItemRecord::new("Whole Milk 1L", "1.29").to_value());
    corner.insert(PEN.into(), ItemRecord::new("Ballpoint Pen", "0.99").to_value());
    db.documents()
        .set_fields(SHOPS_COLLECTION, "Corner Store", &corner)
        .await
        .unwrap();

    let mut kiosk = Document::new();
    kiosk.insert(MILK.into(), ItemRecord::new("Whole Milk 1L", "1.61").to_value());
    db.documents()
        .set_fields(SHOPS_COLLECTION, "Station Kiosk", &kiosk)
        .await
        .unwrap();

    db
}

struct Station {
    capture: CaptureSession<SimulatedCamera>,
    feed: SimulatedCameraHandle,
    screen: ScannerScreen,
}

fn station(policy: ReportPolicy) -> Station {
    let (reporter, binding) = scan_channel(policy);
    let (camera, feed) = SimulatedCamera::new();
    let capture = CaptureSession::with_feedback(camera, reporter, Arc::new(SilentFeedback));
    Station {
        capture,
        feed,
        screen: ScannerScreen::new(binding),
    }
}

async fn next_result(db: &Database, screen: &mut ScannerScreen) -> ScanResult {
    timeout(Duration::from_secs(2), scanner::next_scan(db, screen))
        .await
        .expect("no scan delivered in time")
        .expect("binding closed")
}

async fn wait_for_frames(feed: &SimulatedCameraHandle, count: u64) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while feed.frames_processed() < count {
        assert!(Instant::now() < deadline, "camera thread did not process frames");
        sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn test_scan_resolves_price_in_selected_shop() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::AwaitReset);

    scanner::on_appear(&db, &mut st.screen, Some("Corner Store")).await;
    assert_eq!(
        st.screen.shop_names(),
        &["Corner Store".to_string(), "Station Kiosk".to_string()]
    );
    st.capture.start().unwrap();

    assert!(st.feed.scan(CodeType::Ean13, MILK));
    let result = next_result(&db, &mut st.screen).await;

    assert_eq!(result.barcode, MILK);
    assert_eq!(result.item_name, "Whole Milk 1L");
    assert_eq!(result.item_price, "1.29");

    st.capture.stop();
}

#[tokio::test]
async fn test_unsupported_codes_are_skipped_within_a_frame() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::AwaitReset);
    scanner::on_appear(&db, &mut st.screen, Some("Corner Store")).await;
    st.capture.start().unwrap();

    assert!(st.feed.push_frame(vec![
        MetadataObject::Face,
        MetadataObject::code(CodeType::Qr, "https://example.com"),
        MetadataObject::undecoded(CodeType::Ean8),
        MetadataObject::code(CodeType::Code128, PEN),
    ]));

    let result = next_result(&db, &mut st.screen).await;
    assert_eq!(result.barcode, PEN);
    assert_eq!(result.item_name, "Ballpoint Pen");
}

#[tokio::test]
async fn test_await_reset_ignores_scans_until_scan_again() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::AwaitReset);
    scanner::on_appear(&db, &mut st.screen, Some("Corner Store")).await;
    st.capture.start().unwrap();

    st.feed.scan(CodeType::Ean13, MILK);
    next_result(&db, &mut st.screen).await;

    st.feed.scan(CodeType::Ean13, PEN);
    wait_for_frames(&st.feed, 2).await;
    assert_eq!(st.screen.binding_mut().try_update(), None);
    assert_eq!(st.screen.result().barcode, MILK);

    scanner::scan_again(&mut st.screen);
    assert_eq!(st.screen.result(), &ScanResult::default());

    st.feed.scan(CodeType::Ean13, PEN);
    let result = next_result(&db, &mut st.screen).await;
    assert_eq!(result.barcode, PEN);
    assert_eq!(result.item_price, "0.99");
}

#[tokio::test]
async fn test_every_frame_reports_without_reset() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::EveryFrame);
    scanner::on_appear(&db, &mut st.screen, Some("Corner Store")).await;
    st.capture.start().unwrap();

    st.feed.scan(CodeType::Ean13, MILK);
    assert_eq!(next_result(&db, &mut st.screen).await.barcode, MILK);

    st.feed.scan(CodeType::Ean13, PEN);
    assert_eq!(next_result(&db, &mut st.screen).await.barcode, PEN);
}

#[tokio::test]
async fn test_unknown_barcode_shows_placeholders() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::AwaitReset);
    scanner::on_appear(&db, &mut st.screen, Some("Station Kiosk")).await;
    st.capture.start().unwrap();

    st.feed.scan(CodeType::Ean13, PEN);
    let result = next_result(&db, &mut st.screen).await;

    assert_eq!(result.barcode, PEN);
    assert_eq!(result.item_name, "Unknown item");
    assert_eq!(result.item_price, "0");
}

#[tokio::test]
async fn test_switching_shop_reprices_current_barcode() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::AwaitReset);
    scanner::on_appear(&db, &mut st.screen, Some("Corner Store")).await;
    st.capture.start().unwrap();

    st.feed.scan(CodeType::Ean13, MILK);
    next_result(&db, &mut st.screen).await;

    scanner::select_shop(&mut st.screen, "Station Kiosk");
    scanner::lookup(&db, &mut st.screen).await;
    assert_eq!(st.screen.result().item_price, "1.61");
}

#[tokio::test]
async fn test_missing_shop_keeps_what_was_shown() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::AwaitReset);
    scanner::on_appear(&db, &mut st.screen, Some("Corner Store")).await;
    st.capture.start().unwrap();

    st.feed.scan(CodeType::Ean13, MILK);
    next_result(&db, &mut st.screen).await;

    scanner::select_shop(&mut st.screen, "Closed Down");
    scanner::lookup(&db, &mut st.screen).await;

    let result = st.screen.result();
    assert_eq!(result.item_name, "Whole Milk 1L");
    assert_eq!(result.item_price, "1.29");
}

#[tokio::test]
async fn test_no_shop_selected_skips_lookup() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::AwaitReset);
    scanner::on_appear(&db, &mut st.screen, None).await;
    st.capture.start().unwrap();

    st.feed.scan(CodeType::Ean13, MILK);
    let result = next_result(&db, &mut st.screen).await;

    assert_eq!(result.barcode, MILK);
    assert_eq!(result.item_name, "Unknown item");
    assert_eq!(result.item_price, "0");
}

#[tokio::test]
async fn test_stopped_camera_sees_nothing() {
    let db = seeded_db().await;
    let mut st = station(ReportPolicy::AwaitReset);
    scanner::on_appear(&db, &mut st.screen, Some("Corner Store")).await;

    assert!(!st.feed.scan(CodeType::Ean13, MILK));

    st.capture.start().unwrap();
    st.capture.stop();
    assert!(!st.feed.scan(CodeType::Ean13, MILK));
    assert_eq!(st.feed.released(), 1);
    assert_eq!(st.screen.binding_mut().try_update(), None);
}
