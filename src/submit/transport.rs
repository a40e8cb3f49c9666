use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tokio::fs::File;
use url::Url;

use crate::request::job::{strip_path, JobParams};

/// The two requests a submission makes against the GWAS target service
pub trait Transport {
    /// Upload one local file as the multipart field `file`
    async fn upload(&self, endpoint: &Url, path: &Path) -> Result<()>;

    /// POST the job description as JSON
    async fn submit(&self, endpoint: &Url, job: &JobParams) -> Result<()>;
}

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest client that gives up on stalled connections
///
/// There is no deadline on a whole request: a large upload may take as long as it needs while
/// data keeps moving.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// `read_timeout` bounds each read and resets whenever data arrives
    pub fn new(read_timeout: Duration) -> Result<HttpTransport> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(read_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    async fn upload(&self, endpoint: &Url, path: &Path) -> Result<()> {
        let file = File::open(path)
            .await
            .with_context(|| format!("Can't read file {}", path.display()))?;
        let length = file
            .metadata()
            .await
            .with_context(|| format!("Can't read file {}", path.display()))?
            .len();
        info!("Uploading file {} ({} bytes)", path.display(), length);

        // the file is streamed from disk and closed when the request body is dropped
        let part = Part::stream_with_length(file, length).file_name(strip_path(path)?);
        let form = Form::new().part("file", part);

        self.client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Uploading {} to {}", path.display(), endpoint))?;
        Ok(())
    }

    async fn submit(&self, endpoint: &Url, job: &JobParams) -> Result<()> {
        self.client
            .post(endpoint.clone())
            .json(job)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("Submitting job {} to {}", job.id, endpoint))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::Path;
    use std::thread;

    use uuid::Uuid;

    use super::*;
    use crate::params::tests::example;

    /// Accept one request, answer with `status`, and hand back the raw request text
    fn serve_once(status: &'static str) -> (Url, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let response = format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (Url::parse(&format!("http://{addr}/api/test")).unwrap(), handle)
    }

    /// Accept one request and answer in `pieces`, pausing `gap` before each one
    fn serve_in_pieces(pieces: &'static [&'static str], gap: Duration) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            for piece in pieces {
                thread::sleep(gap);
                if stream.write_all(piece.as_bytes()).is_err() {
                    return;
                }
            }
        });
        Url::parse(&format!("http://{addr}/api/test")).unwrap()
    }

    fn read_request(stream: &mut impl Read) -> String {
        let mut request = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let read = stream.read(&mut buf).unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buf[..read]);
            if is_complete(&request) {
                break;
            }
        }
        String::from_utf8_lossy(&request).into_owned()
    }

    fn is_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let headers = text[..header_end].to_ascii_lowercase();
        let length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok());
        match length {
            Some(length) => request.len() >= header_end + 4 + length,
            None => !headers.contains("transfer-encoding: chunked") || text.ends_with("0\r\n\r\n"),
        }
    }

    #[tokio::test]
    async fn upload_sends_multipart_file_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pvals.txt");
        std::fs::write(&path, "SNP\tP\nrs123\t0.01\n").unwrap();

        let (url, server) = serve_once("200 OK");
        let transport = HttpTransport::new(Duration::from_secs(10)).unwrap();
        transport.upload(&url, &path).await.unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/test HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains("name=\"file\"; filename=\"pvals.txt\""));
        assert!(request.contains("rs123\t0.01"));
    }

    #[tokio::test]
    async fn upload_streams_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sumstats.txt");
        let mut contents = "rs1\t0.5\n".repeat(50_000);
        contents.push_str("END-OF-FILE\n");
        std::fs::write(&path, &contents).unwrap();

        let (url, server) = serve_once("200 OK");
        let transport = HttpTransport::new(Duration::from_secs(10)).unwrap();
        transport.upload(&url, &path).await.unwrap();

        let request = server.join().unwrap();
        assert!(request.len() > contents.len());
        assert!(request.contains("END-OF-FILE\n"));
    }

    #[tokio::test]
    async fn slow_response_outlasting_read_timeout_succeeds() {
        // each pause is under the timeout, all of them together are not
        static PIECES: [&str; 4] = ["HTTP/1.1 200 OK\r\n", "Content-Length: 0\r\n", "Connection: close\r\n", "\r\n"];
        let url = serve_in_pieces(&PIECES, Duration::from_millis(800));
        let job = JobParams::new(&example(Path::new("pvals.txt")), Uuid::new_v4()).unwrap();

        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        transport.submit(&url, &job).await.unwrap();
    }

    #[tokio::test]
    async fn stalled_response_times_out() {
        static PIECES: [&str; 1] = ["HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n"];
        let url = serve_in_pieces(&PIECES, Duration::from_secs(5));
        let job = JobParams::new(&example(Path::new("pvals.txt")), Uuid::new_v4()).unwrap();

        let transport = HttpTransport::new(Duration::from_millis(500)).unwrap();
        let err = transport.submit(&url, &job).await.unwrap_err();
        assert!(err.to_string().starts_with("Submitting job"));
    }

    #[tokio::test]
    async fn upload_of_unreadable_file_fails_before_request() {
        let dir = tempfile::tempdir().unwrap();
        let transport = HttpTransport::new(Duration::from_secs(10)).unwrap();
        let url = Url::parse("http://127.0.0.1:9/api/upload").unwrap();

        let err = transport.upload(&url, &dir.path().join("missing.txt")).await.unwrap_err();
        assert!(err.to_string().starts_with("Can't read file"));
    }

    #[tokio::test]
    async fn submit_posts_json_and_fails_on_error_status() {
        let job = JobParams::new(&example(Path::new("pvals.txt")), Uuid::new_v4()).unwrap();
        let transport = HttpTransport::new(Duration::from_secs(10)).unwrap();

        let (url, server) = serve_once("200 OK");
        transport.submit(&url, &job).await.unwrap();
        let request = server.join().unwrap();
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.contains(&format!("\"id\":\"{}\"", job.id)));
        assert!(request.contains("\"sampleSize\":5000"));

        let (url, server) = serve_once("500 Internal Server Error");
        let err = transport.submit(&url, &job).await.unwrap_err();
        server.join().unwrap();
        assert!(err.to_string().starts_with("Submitting job"));
    }
}
