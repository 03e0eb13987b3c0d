//! Integration tests for generate, streamed and buffered, against a mock server

use futures::StreamExt;
use ollama_kit::client::{Ollama, OllamaConfig};
use ollama_kit::{Error, GenerateChunk, GenerateRequest, Options, StreamChunk, StructuredOutput};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Ollama {
    let config = OllamaConfig::with_base_url(&server.uri()).unwrap();
    Ollama::with_config(config).unwrap()
}

fn ndjson(lines: &[serde_json::Value]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

fn hello_stream() -> String {
    ndjson(&[
        json!({"model": "llama3", "created_at": "2024-05-01T10:00:00Z", "response": "Hel", "done": false}),
        json!({"model": "llama3", "created_at": "2024-05-01T10:00:01Z", "response": "lo", "done": true,
               "done_reason": "stop", "context": [1, 2], "eval_count": 2, "eval_duration": 1000}),
    ])
}

/// Serve one request with a chunked NDJSON body, pausing before every line
/// after the first
async fn serve_slowly(lines: Vec<Value>, pause: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;

        socket
            .write_all(
                b"HTTP/1.1 200 OK\r\n\
                  content-type: application/x-ndjson\r\n\
                  transfer-encoding: chunked\r\n\r\n",
            )
            .await
            .unwrap();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(pause).await;
            }
            let data = format!("{line}\n");
            let frame = format!("{:x}\r\n{data}\r\n", data.len());
            socket.write_all(frame.as_bytes()).await.unwrap();
            socket.flush().await.unwrap();
        }
        socket.write_all(b"0\r\n\r\n").await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{addr}")
}

async fn read_request(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&request);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .find_map(|header| {
                    let (name, value) = header.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if request.len() >= end + 4 + length {
                return;
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Forecast {
    city: String,
    celsius: i32,
}

impl StructuredOutput for Forecast {
    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "city": {"type": "string"},
                "celsius": {"type": "integer"}
            },
            "required": ["city", "celsius"]
        })
    }
}

async fn mount_generate(server: &MockServer, stream: bool, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"model": "llama3", "stream": stream})))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[test_log::test(tokio::test)]
async fn test_streamed_generate_concatenates_chunks() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        true,
        ResponseTemplate::new(200).set_body_raw(hello_stream(), "application/x-ndjson"),
    )
    .await;

    let client = client_for(&server);
    let mut fragments = Vec::new();
    let result = client
        .generate_with(&GenerateRequest::new("llama3", "Say hello"), |chunk| {
            fragments.push(chunk.response.clone());
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(fragments, vec!["Hel", "lo"]);
    assert_eq!(result.response, "Hello");
    assert_eq!(result.http_status, 200);
    assert_eq!(result.model, "llama3");
    assert_eq!(result.done_reason.as_deref(), Some("stop"));
    assert_eq!(result.context, Some(vec![1, 2]));
    assert_eq!(result.stats.and_then(|s| s.eval_count), Some(2));
}

#[tokio::test]
async fn test_buffered_generate() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        false,
        ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3",
            "response": "Because of Rayleigh scattering.",
            "done": true,
            "total_duration": 5_000_000_000u64
        })),
    )
    .await;

    let client = client_for(&server);
    let result = client
        .generate(&GenerateRequest::new("llama3", "Why is the sky blue?"))
        .await
        .unwrap();

    assert_eq!(result.response, "Because of Rayleigh scattering.");
    assert_eq!(
        result.stats.and_then(|s| s.total()),
        Some(Duration::from_secs(5))
    );
}

#[tokio::test]
async fn test_options_and_format_reach_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "options": {"seed": 42, "num_ctx": 2048},
            "format": "json",
            "raw": true
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": "{}", "done": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerateRequest::builder("llama3", "[INST] hi [/INST]")
        .raw(true)
        .format(ollama_kit::ResponseFormat::Json)
        .options(Options::builder().seed(42).num_ctx(2048).build())
        .build();

    let result = client_for(&server).generate(&request).await.unwrap();
    assert_eq!(result.response, "{}");
}

#[tokio::test]
async fn test_pull_based_stream() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        true,
        ResponseTemplate::new(200).set_body_raw(hello_stream(), "application/x-ndjson"),
    )
    .await;

    let mut stream = client_for(&server)
        .generate_stream(&GenerateRequest::new("llama3", "Say hello"))
        .await
        .unwrap();

    let mut text = String::new();
    let mut done = 0;
    while let Some(chunk) = stream.next().await {
        let chunk: GenerateChunk = chunk.unwrap();
        text.push_str(chunk.text());
        if chunk.is_done() {
            done += 1;
        }
    }
    assert_eq!(text, "Hello");
    assert_eq!(done, 1);
}

#[tokio::test]
async fn test_non_success_status_is_upstream_error() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        true,
        ResponseTemplate::new(404).set_body_string(r#"{"error":"model 'llama3' not found"}"#),
    )
    .await;

    let err = client_for(&server)
        .generate_with(&GenerateRequest::new("llama3", "hi"), |_| Ok(()))
        .await
        .unwrap_err();

    match err {
        Error::Upstream { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("not found"));
        }
        other => panic!("Expected Upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_line_is_decode_error() {
    let server = MockServer::start().await;
    let body = format!(
        "{}\n{{\"response\": oops}}\n",
        json!({"response": "fine", "done": false})
    );
    mount_generate(
        &server,
        true,
        ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"),
    )
    .await;

    let mut seen = Vec::new();
    let err = client_for(&server)
        .generate_with(&GenerateRequest::new("llama3", "hi"), |chunk| {
            seen.push(chunk.response.clone());
            Ok(())
        })
        .await
        .unwrap_err();

    assert_eq!(seen, vec!["fine"]);
    match err {
        Error::Decode { line, .. } => assert_eq!(line, "{\"response\": oops}"),
        other => panic!("Expected Decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_truncated_stream_is_decode_error() {
    let server = MockServer::start().await;
    let body = ndjson(&[json!({"response": "partial", "done": false})]);
    mount_generate(
        &server,
        true,
        ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"),
    )
    .await;

    let err = client_for(&server)
        .generate_with(&GenerateRequest::new("llama3", "hi"), |_| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_callback_error_aborts_generation() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        true,
        ResponseTemplate::new(200).set_body_raw(hello_stream(), "application/x-ndjson"),
    )
    .await;

    let err = client_for(&server)
        .generate_with(&GenerateRequest::new("llama3", "hi"), |_| {
            Err(Error::callback("enough"))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Callback(_)));
}

#[tokio::test]
async fn test_async_generation_delivers_fragments() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        true,
        ResponseTemplate::new(200).set_body_raw(hello_stream(), "application/x-ndjson"),
    )
    .await;

    let client = client_for(&server);
    let mut task = client.generate_async(GenerateRequest::new("llama3", "Say hello"));

    let mut fragments = Vec::new();
    while let Some(fragment) = task.next_chunk().await {
        fragments.push(fragment);
    }
    assert_eq!(fragments.concat(), "Hello");

    let result = task.join().await.unwrap();
    assert_eq!(result.response, "Hello");
}

#[tokio::test]
async fn test_async_generation_cancel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(hello_stream(), "application/x-ndjson")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut task = client.generate_async(GenerateRequest::new("llama3", "Say hello"));
    task.cancel();

    assert!(task.is_cancelled());
    assert_eq!(task.next_chunk().await, None);
    assert!(matches!(task.join().await, Err(Error::Cancelled)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = OllamaConfig::builder()
        .base_url("http://127.0.0.1:9")
        .connect_timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let client = Ollama::with_config(config).unwrap();

    let err = client
        .generate(&GenerateRequest::new("llama3", "hi"))
        .await
        .unwrap_err();
    assert!(err.is_retryable(), "got {err:?}");
}

#[test_log::test(tokio::test)]
async fn test_slow_stream_outlives_request_timeout() {
    let base_url = serve_slowly(
        vec![
            json!({"model": "llama3", "response": "Hel", "done": false}),
            json!({"model": "llama3", "response": "lo", "done": true}),
        ],
        Duration::from_millis(1500),
    )
    .await;

    let config = OllamaConfig::builder()
        .base_url(base_url)
        .request_timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let client = Ollama::with_config(config).unwrap();

    let mut seen = Vec::new();
    let result = client
        .generate_with(&GenerateRequest::new("llama3", "Say hello"), |chunk| {
            seen.push(chunk.response.clone());
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(seen, vec!["Hel", "lo"]);
    assert_eq!(result.response, "Hello");
}

#[tokio::test]
async fn test_structured_generation_over_a_stream() {
    let server = MockServer::start().await;
    let body = ndjson(&[
        json!({"model": "llama3", "response": "{\"city\": ", "done": false}),
        json!({"model": "llama3", "response": "\"Oslo\", \"cel", "done": false}),
        json!({"model": "llama3", "response": "sius\": -3}", "done": false}),
        json!({"model": "llama3", "response": "", "done": true}),
    ]);
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({"stream": true, "format": {"type": "object"}})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/x-ndjson"))
        .expect(1)
        .mount(&server)
        .await;

    let mut fragments = 0;
    let structured = client_for(&server)
        .generate_structured_with::<Forecast, _>(
            &GenerateRequest::new("llama3", "Weather in Oslo as JSON"),
            |_| {
                fragments += 1;
                Ok(())
            },
        )
        .await
        .unwrap();

    assert_eq!(fragments, 4);
    assert_eq!(
        structured.value(),
        Some(&Forecast {
            city: "Oslo".into(),
            celsius: -3
        })
    );
}

#[tokio::test]
async fn test_cancel_after_completion_reports_cancelled() {
    let server = MockServer::start().await;
    mount_generate(
        &server,
        true,
        ResponseTemplate::new(200).set_body_raw(hello_stream(), "application/x-ndjson"),
    )
    .await;

    let client = client_for(&server);
    let mut task = client.generate_async(GenerateRequest::new("llama3", "Say hello"));
    while task.next_chunk().await.is_some() {}

    task.cancel();
    assert!(matches!(task.join().await, Err(Error::Cancelled)));
}
