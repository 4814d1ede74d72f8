//! Drives `SmtpProber` against scripted SMTP servers on loopback.

use email_verifier_core::{Config, MailboxProbe, ReasonCode, SmtpProber};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Serves one connection: writes the greeting, then answers each client line
/// with the next scripted reply. Returns the command lines it received.
async fn scripted_server<S: Into<String>>(replies: Vec<S>) -> (u16, JoinHandle<Vec<String>>) {
    let replies: Vec<String> = replies.into_iter().map(Into::into).collect();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (read, mut write) = socket.into_split();
        let mut lines = BufReader::new(read).lines();
        let mut received = Vec::new();
        let mut replies = replies.into_iter();

        if let Some(greeting) = replies.next() {
            write.write_all(greeting.as_bytes()).await.unwrap();
        }
        for reply in replies {
            match lines.next_line().await {
                Ok(Some(line)) => received.push(line),
                _ => return received,
            }
            write.write_all(reply.as_bytes()).await.unwrap();
        }
        // Pick up the QUIT, if any.
        if let Ok(Ok(Some(line))) = timeout(Duration::from_millis(300), lines.next_line()).await {
            received.push(line);
        }
        received
    });

    (port, handle)
}

fn prober_for(port: u16, smtp_timeout: Duration) -> SmtpProber {
    let config = Config {
        smtp_port: port,
        smtp_timeout,
        ..Config::default()
    };
    SmtpProber::new(&config)
}

#[tokio::test]
async fn accepted_recipient_is_valid() {
    let (port, server) = scripted_server(vec![
        "220 mx.test ESMTP\r\n",
        "250 mx.test\r\n",
        "250 2.1.0 Ok\r\n",
        "250 2.1.5 Ok\r\n",
    ])
    .await;
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert!(result.valid);
    assert_eq!(result.reason, ReasonCode::MailboxExists);
    assert!(result.response.starts_with("250 2.1.5"));

    let received = server.await.unwrap();
    assert_eq!(
        received,
        vec![
            "EHLO verify.local",
            "MAIL FROM:<verify@verify.local>",
            "RCPT TO:<jane@example.com>",
            "QUIT",
        ]
    );
}

#[tokio::test]
async fn rejected_recipient_is_mailbox_not_found() {
    let (port, server) = scripted_server(vec![
        "220 mx.test ESMTP\r\n",
        "250 mx.test\r\n",
        "250 Ok\r\n",
        "550 5.1.1 User unknown\r\n",
    ])
    .await;
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("nobody@example.com", "127.0.0.1").await;
    assert!(!result.valid);
    assert_eq!(result.reason, ReasonCode::MailboxNotFound);
    assert!(result.response.contains("User unknown"));

    let received = server.await.unwrap();
    assert_eq!(received.last().map(String::as_str), Some("QUIT"));
}

#[tokio::test]
async fn greylisting_reply_is_reported() {
    let (port, _server) = scripted_server(vec![
        "220 mx.test ESMTP\r\n",
        "250 mx.test\r\n",
        "250 Ok\r\n",
        "451 4.7.1 Try again later\r\n",
    ])
    .await;
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert_eq!(result.reason, ReasonCode::Greylisted);
    assert!(result.should_retry());
}

#[tokio::test]
async fn multiline_ehlo_reply_is_consumed_whole() {
    let (port, server) = scripted_server(vec![
        "220-mx.test ESMTP\r\n220 welcome\r\n",
        "250-mx.test\r\n250-PIPELINING\r\n250-SIZE 10240000\r\n250 8BITMIME\r\n",
        "250 Ok\r\n",
        "250 Ok\r\n",
    ])
    .await;
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert!(result.valid, "unexpected result: {:?}", result);

    let received = server.await.unwrap();
    assert_eq!(received[1], "MAIL FROM:<verify@verify.local>");
}

#[tokio::test]
async fn rejected_ehlo_falls_back_to_helo() {
    let (port, server) = scripted_server(vec![
        "220 mx.test SMTP\r\n",
        "502 Command not implemented\r\n",
        "250 mx.test\r\n",
        "250 Ok\r\n",
        "250 Ok\r\n",
    ])
    .await;
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert!(result.valid);

    let received = server.await.unwrap();
    assert_eq!(received[0], "EHLO verify.local");
    assert_eq!(received[1], "HELO verify.local");
    assert_eq!(received[2], "MAIL FROM:<verify@verify.local>");
}

#[tokio::test]
async fn sender_rejection_is_blocked() {
    let (port, _server) = scripted_server(vec![
        "220 mx.test ESMTP\r\n",
        "250 mx.test\r\n",
        "550 5.7.1 Sender rejected\r\n",
    ])
    .await;
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert_eq!(result.reason, ReasonCode::Blocked);
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let _server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });
    let prober = prober_for(port, Duration::from_millis(300));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert!(!result.valid);
    assert_eq!(result.reason, ReasonCode::Timeout);
    assert_eq!(result.response, "Connection timeout");
}

#[tokio::test]
async fn early_close_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert!(!result.valid);
    assert_eq!(result.reason, ReasonCode::ConnectionError);
}

#[tokio::test]
async fn refused_port_is_connection_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert!(!result.valid);
    assert_eq!(result.reason, ReasonCode::ConnectionError);
}

#[tokio::test]
async fn overlong_reply_line_is_smtp_error() {
    let greeting = format!("220 {}\r\n", "x".repeat(5000));
    let (port, _server) = scripted_server(vec![greeting]).await;
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert!(!result.valid);
    assert_eq!(result.reason, ReasonCode::SmtpError);
    assert!(result.response.contains("exceeds"));
}

#[tokio::test]
async fn endless_multiline_reply_is_smtp_error() {
    let flood = "250-filler\r\n".repeat(500) + "250 done\r\n";
    let (port, _server) =
        scripted_server(vec!["220 mx.test ESMTP\r\n".to_string(), flood]).await;
    let prober = prober_for(port, Duration::from_secs(2));

    let result = prober.probe("jane@example.com", "127.0.0.1").await;
    assert!(!result.valid);
    assert_eq!(result.reason, ReasonCode::SmtpError);
}
