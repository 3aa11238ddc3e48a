use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde_json::Value;

#[derive(Debug, Clone)]
pub struct DocsStubConfig {
    pub access_token: String,
    pub documents: HashMap<String, Value>,
}

pub struct DocsStub {
    pub base_url: String,
    requests: Arc<AtomicUsize>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DocsStub {
    pub fn spawn(config: DocsStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start docs stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/v1");

        let requests = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn({
            let requests = Arc::clone(&requests);
            move || {
                loop {
                    if shutdown_rx.try_recv().is_ok() {
                        break;
                    }

                    let request = match server.recv_timeout(Duration::from_millis(50)) {
                        Ok(Some(req)) => req,
                        Ok(None) => continue,
                        Err(_) => break,
                    };
                    requests.fetch_add(1, Ordering::SeqCst);

                    let expected = format!("Bearer {}", config.access_token);
                    let authorized = request
                        .headers()
                        .iter()
                        .any(|h| h.field.equiv("Authorization") && h.value.as_str() == expected);

                    let path = request.url().to_string();
                    let (status, body) = if request.method() != &tiny_http::Method::Get {
                        (405, error_body(405, "method not allowed"))
                    } else if !authorized {
                        (
                            401,
                            error_body(401, "Request had invalid authentication credentials."),
                        )
                    } else {
                        match path
                            .strip_prefix("/v1/documents/")
                            .and_then(|id| config.documents.get(id))
                        {
                            Some(document) => (200, document.to_string()),
                            None => (404, error_body(404, "Requested entity was not found.")),
                        }
                    };

                    let header = tiny_http::Header::from_bytes(
                        &b"Content-Type"[..],
                        &b"application/json"[..],
                    )
                    .expect("build header");
                    let response = tiny_http::Response::from_string(body)
                        .with_status_code(status)
                        .with_header(header);
                    let _ = request.respond(response);
                }
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Drop for DocsStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn error_body(code: u16, message: &str) -> String {
    serde_json::json!({
        "error": { "code": code, "message": message }
    })
    .to_string()
}

fn paragraph(text: &str) -> Value {
    serde_json::json!({
        "paragraph": { "elements": [ { "textRun": { "content": text } } ] }
    })
}

/// A book-shaped document: title table, prologue, one chapter split by a table.
pub fn sample_book(title: &str) -> Value {
    serde_json::json!({
        "documentId": "book-1",
        "title": title,
        "revisionId": "rev",
        "body": {
            "content": [
                { "endIndex": 1, "sectionBreak": { "sectionStyle": {} } },
                paragraph("Prólogo\n"),
                paragraph("hello world\n"),
                paragraph("Capítulo 1\n"),
                {
                    "table": {
                        "rows": 1,
                        "columns": 2,
                        "tableRows": [ { "tableCells": [
                            { "content": [ paragraph("one two ") ] },
                            { "content": [ paragraph("three\n") ] }
                        ] } ]
                    }
                },
                {
                    "paragraph": { "elements": [
                        { "inlineObjectElement": { "inlineObjectId": "kix.img" } },
                        { "textRun": { "content": "four\n" } }
                    ] }
                }
            ]
        }
    })
}
