// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{http::header, http::StatusCode, routing::get, Router};
use std::time::Duration;
use tokio::net::TcpListener;

const HTML: [(header::HeaderName, &str); 1] = [(header::CONTENT_TYPE, "text/html; charset=utf-8")];

/// 启动本地站点，返回 `127.0.0.1:port`（不带协议）
///
/// - `/cx`：正文提到客户体验负责人
/// - `/plain`：无关键词
/// - `/nav-only`：关键词只出现在导航和脚本中
/// - `/gone`：404
/// - `/slow`：超过抓取超时
pub async fn start_site_server() -> String {
    let app = Router::new()
        .route(
            "/cx",
            get(|| async {
                (
                    HTML,
                    "<html><body><main><h1>Team</h1><p>Sam Park, VP of Customer Experience</p></main></body></html>",
                )
            }),
        )
        .route(
            "/plain",
            get(|| async { (HTML, "<html><body><p>Industrial valves and fittings.</p></body></html>") }),
        )
        .route(
            "/nav-only",
            get(|| async {
                (
                    HTML,
                    r#"<html><body><nav>Customer Support</nav><script>track("cx")</script><p>Boats.</p></body></html>"#,
                )
            }),
        )
        .route("/gone", get(|| async { (StatusCode::NOT_FOUND, "missing") }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                (HTML, "<p>support</p>")
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}
