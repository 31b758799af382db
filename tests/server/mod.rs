use actix_web::{App, HttpResponse, HttpServer, web};
use std::time::Duration;
use tokio::net::TcpListener;

/// Starts a link test server on an ephemeral port and returns its base URL.
#[allow(dead_code)]
pub async fn start_link_test_server() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route("/ok", web::head().to(|| async { HttpResponse::Ok().finish() }))
            .route(
                "/not-found",
                web::head().to(|| async { HttpResponse::NotFound().finish() }),
            )
            .route(
                "/server-error",
                web::head().to(|| async { HttpResponse::InternalServerError().finish() }),
            )
            .route(
                "/redirect",
                web::head().to(|| async {
                    HttpResponse::MovedPermanently()
                        .append_header(("Location", "https://defang.io/"))
                        .finish()
                }),
            )
            .route(
                "/redirect-temp",
                web::head().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/ok"))
                        .finish()
                }),
            )
            .route(
                "/slow",
                web::head().to(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    HttpResponse::Ok().finish()
                }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind link test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Link test server error: {}", e);
        }
    });

    url
}

/// Accepts connections and never answers them.
#[allow(dead_code)]
pub async fn start_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind silent server");
    let addr = listener.local_addr().expect("No address bound");

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}", addr)
}
