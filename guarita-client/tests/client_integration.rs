// guarita-client/tests/client_integration.rs
// Integration tests across settings, resolution and materialization

use guarita_client::{
    ClientConfig, ImageSource, Materializer, PrintableImage, Resolution, SettingsStore, keys,
    resolve::resolve_response,
};
use shared::models::{PrinterModel, ReprintResponse};
use tempfile::TempDir;

#[test]
fn test_settings_drive_client_config() {
    let dir = TempDir::new().unwrap();
    let store = SettingsStore::new(dir.path(), "settings.json");
    store.set(keys::BILHETERIA_TOKEN, "tok-bilheteria").unwrap();

    let config = ClientConfig::new("http://10.0.0.1");
    let config = match store.bilheteria_token() {
        Some(token) => config.with_bilheteria_token(token),
        None => config,
    };
    assert_eq!(config.bilheteria_token.as_deref(), Some("tok-bilheteria"));

    let client = config.build_http_client();
    assert_eq!(client.base_url(), "http://10.0.0.1");
}

#[tokio::test]
async fn test_resolution_feeds_materializer() {
    // the reprint response carries an inline layout; the materializer
    // must hand it straight to the bridge
    let response: ReprintResponse = serde_json::from_str(
        r#"{"layout_preenchido":"data:image/png;base64,QUJD","ingresso":{"_id":"t1"}}"#,
    )
    .unwrap();

    let Resolution::Found { ticket, image } = resolve_response("http://10.0.0.1", &response, "c1")
    else {
        panic!("expected Found");
    };
    let image = image.expect("embedded layout should resolve");
    assert!(matches!(image, ImageSource::Embedded(_)));

    let dir = TempDir::new().unwrap();
    let materializer = Materializer::new(dir.path(), Some("secret".into()));
    let printable = materializer
        .materialize(image.url(), ticket.cache_key().unwrap())
        .await
        .unwrap();
    assert_eq!(
        printable,
        PrintableImage::Inline("data:image/png;base64,QUJD".into())
    );
}

#[test]
fn test_settings_file_readable_across_instances() {
    let dir = TempDir::new().unwrap();
    {
        let store = SettingsStore::new(dir.path(), "settings.json");
        store.set(keys::PRINTER_IP, "192.168.0.70").unwrap();
        store.set(keys::PRINTER_MODEL, "QL_810W").unwrap();
    }
    let store = SettingsStore::new(dir.path(), "settings.json");
    let settings = store.printer_settings();
    assert_eq!(settings.ip_address, "192.168.0.70");
    assert_eq!(settings.model, PrinterModel::Ql810W);
}
