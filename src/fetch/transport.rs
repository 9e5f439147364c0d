use futures_util::StreamExt;
use reqwest::{Client, Url};
use std::future::Future;
use std::io::Write;
use std::time::Duration;

use super::FetchError;

/// 传输层：把远程内容写入 `sink`，返回写入字节数
pub trait Transport {
    fn transfer(
        &self,
        locator: &Url,
        sink: &mut dyn Write,
    ) -> impl Future<Output = Result<u64, FetchError>>;
}

/// 基于 reqwest 的 HTTP(S) 下载，响应体按块流式写出
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, FetchError> {
        // 模型文件较大，只限制建连时间，不限制总时长
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("materialize/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn transfer(&self, locator: &Url, sink: &mut dyn Write) -> Result<u64, FetchError> {
        if !matches!(locator.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(locator.scheme().to_string()));
        }

        log::debug!("GET {}", locator);
        let response = self.client.get(locator.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        if let Some(len) = response.content_length() {
            log::debug!("Content-Length: {}", len);
        }

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            sink.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        sink.flush()?;

        Ok(written)
    }
}
