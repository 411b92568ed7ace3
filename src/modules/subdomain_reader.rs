use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads one subdomain per line, trimming whitespace and skipping blank lines.
///
/// Lines are split on raw bytes, so a line that is not valid UTF-8 is decoded
/// lossily instead of aborting the read. Only genuine I/O failures are errors.
pub async fn read_subdomains<R>(reader: R) -> std::io::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.split(b'\n');
    let mut subdomains = Vec::new();
    while let Some(line) = lines.next_segment().await? {
        let line = String::from_utf8_lossy(&line);
        let subdomain = line.trim();
        if !subdomain.is_empty() {
            subdomains.push(subdomain.to_string());
        }
    }

    Ok(subdomains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    // Yields its data once, then fails every read.
    struct BrokenReader {
        data: Option<&'static [u8]>,
    }

    impl AsyncRead for BrokenReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            match self.data.take() {
                Some(data) => {
                    buf.put_slice(data);
                    Poll::Ready(Ok(()))
                }
                None => Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))),
            }
        }
    }

    #[tokio::test]
    async fn test_trims_and_skips_blank_lines() {
        let input = b"  shop.example.com \n\n\t\ncdn.example.com\r\n   \nblog.example.com";
        let subdomains = read_subdomains(BufReader::new(&input[..])).await.unwrap();

        assert_eq!(
            subdomains,
            vec!["shop.example.com", "cdn.example.com", "blog.example.com"]
        );
    }

    #[tokio::test]
    async fn test_empty_input_yields_nothing() {
        let subdomains = read_subdomains(BufReader::new(&b""[..])).await.unwrap();
        assert!(subdomains.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_drop_the_others() {
        let input = b"good-one.example.com\n\xffbad.example.com\ngood-two.example.com\n";
        let subdomains = read_subdomains(BufReader::new(&input[..])).await.unwrap();

        assert_eq!(subdomains.len(), 3);
        assert_eq!(subdomains[0], "good-one.example.com");
        assert_eq!(subdomains[1], "\u{fffd}bad.example.com");
        assert_eq!(subdomains[2], "good-two.example.com");
    }

    #[tokio::test]
    async fn test_read_failure_is_an_error() {
        let reader = BrokenReader { data: Some(b"first.example.com\nsecond") };
        let err = read_subdomains(BufReader::new(reader)).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
