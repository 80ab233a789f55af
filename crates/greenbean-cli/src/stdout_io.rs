use std::io::{self, Write};

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_text(&mut io::stdout().lock(), text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_text(&mut io::stdout().lock(), text, true)
}

/// Writes `text`, treating a closed pipe (e.g. `greenbean ... | head`) as success.
fn write_text(writer: &mut dyn Write, text: &str, newline: bool) -> io::Result<()> {
    let written = writer.write_all(text.as_bytes()).and_then(|()| {
        if newline {
            writer.write_all(b"\n")
        } else {
            Ok(())
        }
    });
    tolerate_broken_pipe(written.and_then(|()| writer.flush()))
}

fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::write_text;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn appends_newline_for_lines() {
        let mut buffer = Vec::new();
        assert!(write_text(&mut buffer, "hello", true).is_ok());
        assert_eq!(buffer, b"hello\n");
    }

    #[test]
    fn broken_pipe_is_not_an_error() {
        assert!(write_text(&mut ClosedPipe, "hello", true).is_ok());
    }
}
