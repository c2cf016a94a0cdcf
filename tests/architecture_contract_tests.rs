//! Architecture contract tests.

mod support;

use support::architecture::{find_lines_containing, path_exists};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "teloxide::",
            "tokio_tungstenite::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "teloxide::",
            "tokio_tungstenite::",
        ],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_does_not_reach_adapters_or_infrastructure() {
    let hits = find_lines_containing(
        "src/application",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "teloxide::",
            "tokio_tungstenite::",
        ],
    );

    assert!(
        hits.is_empty(),
        "application layer must talk to the outside through ports: {hits:#?}"
    );
}

#[test]
fn bot_api_is_confined_to_telegram_adapters_and_runtime() {
    let hits: Vec<_> = find_lines_containing("src", &["teloxide::"])
        .into_iter()
        .filter(|(path, _, _)| {
            !path.starts_with("src/adapter/inbound/telegram/")
                && path != "src/adapter/outbound/telegram.rs"
                && path != "src/infrastructure/runtime.rs"
        })
        .collect();

    assert!(hits.is_empty(), "teloxide used outside its adapters: {hits:#?}");
}

#[test]
fn websocket_client_is_confined_to_lightstreamer_adapter() {
    let hits: Vec<_> = find_lines_containing("src", &["tokio_tungstenite::"])
        .into_iter()
        .filter(|(path, _, _)| {
            !path.starts_with("src/adapter/outbound/lightstreamer/") && path != "src/error.rs"
        })
        .collect();

    assert!(
        hits.is_empty(),
        "WebSocket client used outside the feed adapter: {hits:#?}"
    );
}

#[test]
fn outbound_ports_are_present() {
    for port in ["feed", "messenger", "store"] {
        let path = format!("src/port/outbound/{port}.rs");
        assert!(path_exists(&path), "missing outbound port {path}");
    }
}
