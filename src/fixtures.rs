#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    use crate::command::Command;
    use crate::notice::{NoticeAdapter, UsageAdapter};
    use crate::types::MissingFlag;

    /// In-memory writer whose clones share one buffer, so a test can keep a
    /// handle after giving the CLI its own.
    #[derive(Debug, Clone, Default)]
    pub struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Capture {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Records required-flag notices instead of printing them.
    #[derive(Debug, Default)]
    pub struct RecordingNotices {
        pub calls: RefCell<Vec<MissingFlag>>,
    }

    impl NoticeAdapter for RecordingNotices {
        fn required_flag(&self, name: &str) {
            self.calls.borrow_mut().push(MissingFlag {
                name: name.to_string(),
                command: None,
            });
        }

        fn required_flag_in(&self, name: &str, command: &str) {
            self.calls.borrow_mut().push(MissingFlag {
                name: name.to_string(),
                command: Some(command.to_string()),
            });
        }
    }

    /// Records which command's usage was requested.
    #[derive(Debug, Default)]
    pub struct RecordingUsage {
        pub calls: RefCell<Vec<String>>,
    }

    impl UsageAdapter for RecordingUsage {
        fn command_usage(&self, command: &Command, _out: &mut dyn Write) -> io::Result<()> {
            self.calls.borrow_mut().push(command.name().to_string());
            Ok(())
        }
    }
}
