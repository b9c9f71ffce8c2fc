//! Shared fixtures for the `roster-client` integration tests.

#![allow(dead_code)]

use axum::Router;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
  let addr = listener.local_addr().expect("local addr");
  tokio::spawn(async move {
    axum::serve(listener, router).await.expect("fixture server");
  });
  format!("http://{addr}")
}

/// A static `index.json` mixing both post layouts.
pub fn index_json() -> Value {
  json!({
    "version": 3,
    "regions": ["Vancouver"],
    "universities": [],
    "people": [
      {
        "id": 1,
        "name_cn": "李安娜",
        "name_en": "Ana Li",
        "gender": "女",
        "location": "Toronto",
        "university": "UofT",
        "incidents": 2,
        "last_report_at": "2025-05-01",
        "post_id": "p-1",
        "file": "k3j9x.json",
        "title": "Plagiarism report",
        "summary": "Copied thesis chapters",
        "tags": ["academic", "thesis", "2025"],
        "likes": 10,
        "comments": 3,
        "date": "2025-05-01"
      },
      {
        "id": "2",
        "name_cn": "陈波",
        "name_en": "Bo Chen",
        "gender": "男",
        "location": "Montreal",
        "university": "McGill",
        "post": {
          "id": "p-2",
          "file": "zz81.json",
          "title": "Harassment",
          "likes": 4,
          "date": "2025-05-02T10:00:00Z"
        }
      },
      { "id": "3", "name_en": "No Post", "location": "Toronto", "university": "UofT" },
      {
        "id": "4",
        "name_en": "Pending Person",
        "post_id": "p-4",
        "file": "pending.json",
        "title": "Awaiting review"
      }
    ]
  })
}

/// Detail document for `p-1`.
pub fn approved_detail_json() -> Value {
  json!({
    "id": "p-1",
    "title": "Plagiarism report",
    "meta": { "university": "UofT", "location": "Toronto", "created_at": "2025-05-01T09:30:00Z" },
    "content": [
      { "type": "p", "text": "First paragraph." },
      { "type": "h2", "text": "ignored heading" },
      { "type": "p", "text": "Second paragraph." }
    ],
    "images": [{ "src": "https://img.example/1.jpg", "alt": "evidence" }]
  })
}

/// Detail document for `p-4`, still under review.
pub fn pending_detail_json() -> Value {
  json!({ "id": "p-4", "title": "Awaiting review", "status": "pending", "content": [] })
}
