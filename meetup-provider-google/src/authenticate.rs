//! Interactive OAuth consent flow with a loopback redirect.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;

use anyhow::{Context, Result};
use google_calendar::Client;
use tracing::info;

use crate::app_config::AppConfig;
use crate::session::{Session, SessionData};

pub const REDIRECT_PORT: u16 = 8085;
const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

fn redirect_uri() -> String {
    format!("http://localhost:{REDIRECT_PORT}/callback")
}

/// Pull `code` and `state` out of a request line like
/// `GET /callback?code=xxx&state=yyy HTTP/1.1`.
fn parse_callback(request_line: &str) -> Result<(String, String)> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .context("Invalid request")?;

    let url = url::Url::parse(&format!("http://localhost{url_part}"))?;

    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.to_string())
    };

    let code = query("code").context("No code in callback")?;
    let state = query("state").context("No state in callback")?;

    Ok((code, state))
}

fn wait_for_callback() -> Result<(String, String)> {
    let listener = TcpListener::bind(format!("127.0.0.1:{REDIRECT_PORT}"))
        .with_context(|| format!("Failed to bind to port {REDIRECT_PORT}"))?;

    info!(port = REDIRECT_PORT, "waiting for OAuth callback");

    let (mut stream, _) = listener.accept().context("Failed to accept connection")?;

    let mut reader = BufReader::new(&stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let params = parse_callback(&request_line)?;

    let response = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>\
        <h1>Authentication successful!</h1>\
        <p>You can close this window and return to the terminal.</p>\
        </body></html>";

    stream.write_all(response.as_bytes())?;
    stream.flush()?;

    Ok(params)
}

/// Run the consent flow and store the resulting session at `session_path`.
pub async fn authenticate(app: AppConfig, session_path: &Path) -> Result<Session> {
    let mut client = Client::new(
        app.client_id.clone(),
        app.client_secret.clone(),
        redirect_uri(),
        String::new(),
        String::new(),
    );

    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
    let auth_url = client.user_consent_url(&scopes);

    eprintln!("\nOpen this URL in your browser to authenticate:\n");
    eprintln!("{auth_url}\n");

    if open::that(&auth_url).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let (code, state) = tokio::task::spawn_blocking(wait_for_callback)
        .await
        .context("OAuth callback listener panicked")??;

    info!("received authorization code, exchanging for tokens");

    let tokens = client
        .get_access_token(&code, &state)
        .await
        .context("Failed to exchange code for tokens")?;

    let session = Session::new(
        session_path.to_path_buf(),
        app,
        SessionData::from_access_token(&tokens, None),
    );
    session.save()?;

    Ok(session)
}
