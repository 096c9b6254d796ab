use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::command::{parse_line, percent_to_value, Command};
use crate::controller::ChannelController;
use crate::error::Result;

/// Command loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Terminal: `exit` was entered or input ended.
    Exited,
}

/// Reads operator commands line by line and applies them to a controller.
///
/// Usage messages go to `out`; malformed numbers are dropped with a debug log.
pub struct CommandLoop<W: Write, O: Write> {
    controller: ChannelController<W>,
    out: O,
    state: LoopState,
    lines: u64,
}

impl<W: Write, O: Write> CommandLoop<W, O> {
    pub fn new(controller: ChannelController<W>, out: O) -> Self {
        Self {
            controller,
            out,
            state: LoopState::Running,
            lines: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of lines handled so far.
    pub fn lines_handled(&self) -> u64 {
        self.lines
    }

    pub fn controller(&self) -> &ChannelController<W> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ChannelController<W> {
        &mut self.controller
    }

    /// Consume the loop and return its controller.
    pub fn into_controller(self) -> ChannelController<W> {
        self.controller
    }

    /// Handle one line of input.
    ///
    /// Parse errors are recovered here. Link failures are returned.
    pub fn handle_line(&mut self, line: &str) -> Result<LoopState> {
        if self.state == LoopState::Exited {
            return Ok(self.state);
        }
        self.lines += 1;

        let command = match parse_line(line) {
            Ok(command) => command,
            Err(err) => {
                match err.usage() {
                    Some(usage) => {
                        writeln!(self.out, "{usage}")?;
                        self.out.flush()?;
                    }
                    None => debug!(error = %err, line = self.lines, "dropping command"),
                }
                return Ok(self.state);
            }
        };

        match command {
            Command::Empty => {}
            Command::Exit => {
                info!("exit requested");
                self.state = LoopState::Exited;
            }
            Command::SetOne { channel, value } => {
                self.controller.set_channel(channel, value)?;
            }
            Command::SetPercent { channel, percent } => {
                self.controller
                    .set_channel(channel, percent_to_value(percent))?;
            }
            Command::SetMultiple(assignments) => {
                for assignment in assignments {
                    self.controller
                        .set_channel(assignment.channel, assignment.value)?;
                }
            }
        }

        Ok(self.state)
    }

    /// Run until `exit` or end of input.
    ///
    /// No line is read after the loop has exited. Bytes that are not UTF-8
    /// are replaced, so such a line fails to parse and is dropped.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<LoopState> {
        let mut buf = Vec::new();
        while self.state == LoopState::Running {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                debug!("end of command input");
                self.state = LoopState::Exited;
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.handle_line(&line)?;
        }
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::error::ControlError;

    type TestLoop = CommandLoop<Cursor<Vec<u8>>, Vec<u8>>;

    fn new_loop() -> TestLoop {
        CommandLoop::new(ChannelController::new(Cursor::new(Vec::new())), Vec::new())
    }

    fn wire(repl: &TestLoop) -> Vec<u8> {
        repl.controller()
            .link()
            .expect("link should be open")
            .get_ref()
            .clone()
    }

    fn printed(repl: &TestLoop) -> String {
        String::from_utf8(repl.out.clone()).unwrap()
    }

    #[test]
    fn starts_running() {
        assert_eq!(new_loop().state(), LoopState::Running);
    }

    #[test]
    fn setmultiple_sets_each_channel() {
        let mut repl = new_loop();
        repl.handle_line("sm 10 20 3:99").unwrap();

        let ctl = repl.controller();
        assert_eq!(ctl.channel(0), Some(10));
        assert_eq!(ctl.channel(1), Some(20));
        assert_eq!(ctl.channel(2), None);
        assert_eq!(ctl.channel(3), Some(99));
        assert_eq!(
            wire(&repl),
            vec![181, 0, 4, 10, 181, 1, 4, 20, 181, 3, 4, 99]
        );
    }

    #[test]
    fn exit_stops_reading() {
        let mut repl = new_loop();
        let mut input = Cursor::new(b"exit\nso 0 64\n".to_vec());

        assert_eq!(repl.run(&mut input).unwrap(), LoopState::Exited);
        assert_eq!(input.position(), 5);
        assert!(wire(&repl).is_empty());
        assert_eq!(repl.lines_handled(), 1);
    }

    #[test]
    fn non_numeric_channel_is_dropped_silently() {
        let mut repl = new_loop();
        assert_eq!(repl.handle_line("so abc 5").unwrap(), LoopState::Running);
        assert!(wire(&repl).is_empty());
        assert!(printed(&repl).is_empty());
    }

    #[test]
    fn non_utf8_line_is_dropped() {
        let mut repl = new_loop();
        let input = Cursor::new(b"so 0 \xff\xfe\nso 1 64\nexit\n".to_vec());

        assert_eq!(repl.run(input).unwrap(), LoopState::Exited);
        assert_eq!(repl.controller().channel(0), None);
        assert_eq!(repl.controller().channel(1), Some(64));
        assert_eq!(wire(&repl), vec![181, 1, 4, 64]);
        assert_eq!(repl.lines_handled(), 3);
    }

    #[test]
    fn huge_values_wrap_through_the_loop() {
        let mut repl = new_loop();
        repl.handle_line("so 0 3000000000").unwrap();
        repl.handle_line("sm 2:-2049").unwrap();
        assert_eq!(wire(&repl), vec![181, 0, 2, 191, 181, 2, 4, 0]);
    }

    #[test]
    fn unknown_command_prints_usage_and_keeps_running() {
        let mut repl = new_loop();
        assert_eq!(repl.handle_line("fly 1").unwrap(), LoopState::Running);
        assert!(printed(&repl).starts_with("Unknown command 'fly'"));
    }

    #[test]
    fn blank_line_is_a_no_op() {
        let mut repl = new_loop();
        assert_eq!(repl.handle_line("\n").unwrap(), LoopState::Running);
        assert!(printed(&repl).is_empty());
        assert!(wire(&repl).is_empty());
    }

    #[test]
    fn repeated_setone_sends_once() {
        let mut repl = new_loop();
        let input = Cursor::new(b"so 0 64\nso 0 64\ne\n".to_vec());
        repl.run(input).unwrap();
        assert_eq!(wire(&repl), vec![181, 0, 4, 64]);
    }

    #[test]
    fn setpercent_scales_to_channel_range() {
        let mut repl = new_loop();
        repl.handle_line("sp 1 50").unwrap();
        assert_eq!(repl.controller().channel(1), Some(512));
    }

    #[test]
    fn end_of_input_exits() {
        let mut repl = new_loop();
        let state = repl.run(Cursor::new(b"so 2 1".to_vec())).unwrap();
        assert_eq!(state, LoopState::Exited);
        assert_eq!(repl.controller().channel(2), Some(1));
    }

    #[test]
    fn out_of_range_channel_keeps_running() {
        let mut repl = new_loop();
        assert_eq!(repl.handle_line("so 42 1").unwrap(), LoopState::Running);
        assert!(wire(&repl).is_empty());
    }

    #[test]
    fn link_failure_is_returned() {
        let mut ctl = ChannelController::new(Cursor::new(Vec::new()));
        ctl.close().unwrap();
        let mut repl = CommandLoop::new(ctl, Vec::new());

        let err = repl.handle_line("so 0 1").unwrap_err();
        assert!(matches!(err, ControlError::Closed));
    }

    #[test]
    fn lines_after_exit_are_ignored() {
        let mut repl = new_loop();
        repl.handle_line("e").unwrap();
        assert_eq!(repl.handle_line("so 0 1").unwrap(), LoopState::Exited);
        assert!(wire(&repl).is_empty());
    }
}
