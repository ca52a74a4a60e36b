//! Out-of-process agents: JSON lines over a child's stdin/stdout.
//!
//! A module path `process:<program> [args...]` names a command. The module
//! probes it once for its version, then spawns one child per instance.
//!
//! ## Protocol
//!
//! One request object per line, one response object per line:
//!
//! | request `type` | extra fields        | response                          |
//! |----------------|---------------------|-----------------------------------|
//! | `hello`        |                     | `{"version": 1}`                  |
//! | `create`       | `config`            | `{"ok": true}` or `{"ok": false, "error": "..."}` |
//! | `game_start`   | `seat`, `seed`      | `{"ok": true}`                    |
//! | `turn`         | `state`             | an action                         |
//! | `bid`          | `state`, `auction`  | an action (`auction_bid`)         |
//! | `trade`        | `state`, `offer`    | an action (`trade_response`)      |

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::traits::{Agent, AgentModule};
use crate::core::{Action, AgentError, AuctionView, SeatId, StateView, TradeOffer};

/// Module path prefix handled by `ProcessModule`.
pub const PROCESS_PREFIX: &str = "process:";

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Request<'a> {
    Hello,
    Create { config: &'a str },
    GameStart { seat: SeatId, seed: u64 },
    Turn { state: &'a StateView },
    Bid { state: &'a StateView, auction: &'a AuctionView },
    Trade { state: &'a StateView, offer: &'a TradeOffer },
}

#[derive(Debug, Deserialize)]
struct HelloReply {
    version: u32,
}

#[derive(Debug, Deserialize)]
struct Ack {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// A running agent process.
struct AgentProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl AgentProcess {
    fn spawn(program: &str, args: &[String]) -> Result<Self, AgentError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AgentError::Protocol("failed to capture agent stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AgentError::Protocol("failed to capture agent stdout".to_string()))?;

        debug!(program, pid = child.id(), "spawned agent process");
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    /// Send one request and read one response line.
    fn call<T: DeserializeOwned>(&mut self, request: &Request<'_>) -> Result<T, AgentError> {
        let line = serde_json::to_string(request)?;
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        trace!(bytes = line.len(), "wrote agent request");

        let mut response = String::new();
        if self.stdout.read_line(&mut response)? == 0 {
            return Err(AgentError::Protocol(
                "agent process exited before responding".to_string(),
            ));
        }
        trace!(bytes = response.len(), "read agent response");
        Ok(serde_json::from_str(response.trim())?)
    }

    fn acknowledge(&mut self, request: &Request<'_>) -> Result<(), AgentError> {
        let ack: Ack = self.call(request)?;
        if ack.ok {
            Ok(())
        } else {
            Err(AgentError::Protocol(
                ack.error.unwrap_or_else(|| "request rejected".to_string()),
            ))
        }
    }
}

impl Drop for AgentProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// A strategy implemented by an external command.
#[derive(Clone, Debug)]
pub struct ProcessModule {
    path: String,
    program: String,
    args: Vec<String>,
    version: u32,
}

impl ProcessModule {
    /// Probe the command named by a `process:` module path.
    pub fn connect(path: &str) -> Result<Self, AgentError> {
        let command = path.strip_prefix(PROCESS_PREFIX).unwrap_or(path);
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| AgentError::UnknownModule(path.to_string()))?
            .to_string();
        let args: Vec<String> = parts.map(String::from).collect();

        let mut probe = AgentProcess::spawn(&program, &args)?;
        let hello: HelloReply = probe.call(&Request::Hello)?;

        Ok(Self {
            path: path.to_string(),
            program,
            args,
            version: hello.version,
        })
    }
}

impl AgentModule for ProcessModule {
    fn abi_version(&self) -> u32 {
        self.version
    }

    fn create(&self, config: &str) -> Result<Box<dyn Agent>, AgentError> {
        let mut process = AgentProcess::spawn(&self.program, &self.args)?;
        let ack: Ack = process.call(&Request::Create { config })?;
        if !ack.ok {
            return Err(AgentError::Construction {
                path: self.path.clone(),
                reason: ack.error.unwrap_or_else(|| "constructor failed".to_string()),
            });
        }
        Ok(Box::new(ProcessAgent { process }))
    }
}

/// Agent instance backed by its own child process.
struct ProcessAgent {
    process: AgentProcess,
}

impl Agent for ProcessAgent {
    fn game_start(&mut self, seat: SeatId, seed: u64) -> Result<(), AgentError> {
        self.process.acknowledge(&Request::GameStart { seat, seed })
    }

    fn take_turn(&mut self, state: &StateView) -> Result<Action, AgentError> {
        self.process.call(&Request::Turn { state })
    }

    fn bid(&mut self, state: &StateView, auction: &AuctionView) -> Result<Action, AgentError> {
        self.process.call(&Request::Bid { state, auction })
    }

    fn respond_to_trade(
        &mut self,
        state: &StateView,
        offer: &TradeOffer,
    ) -> Result<Action, AgentError> {
        self.process.call(&Request::Trade { state, offer })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::{GameState, Rules};

    const SCRIPT: &str = r#"
while IFS= read -r line; do
  case "$line" in
    *'"type":"hello"'*) echo '{"version":1}' ;;
    *'"type":"create"'*) echo '{"ok":true}' ;;
    *'"type":"game_start"'*) echo '{"ok":true}' ;;
    *'"type":"turn"'*) echo '{"type":"end_turn"}' ;;
    *'"type":"bid"'*) echo '{"type":"auction_bid","amount":7}' ;;
    *) echo 'garbage' ;;
  esac
done
"#;

    fn script_path(name: &str) -> String {
        let path = std::env::temp_dir().join(format!("monopoly-arena-{name}-{}.sh", std::process::id()));
        std::fs::write(&path, SCRIPT).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_process_agent_round_trip() {
        let script = script_path("roundtrip");
        let module = ProcessModule::connect(&format!("process:sh {script}")).unwrap();
        assert_eq!(module.abi_version(), 1);

        let mut agent = module.create("{}").unwrap();
        agent.game_start(SeatId::new(1), 99).unwrap();

        let view = StateView::of(&GameState::new(1, 2, 3, Rules::default()));
        assert_eq!(agent.take_turn(&view).unwrap(), Action::EndTurn);

        let auction = AuctionView {
            asset: crate::board::AssetId(0),
            position: 1,
            high_bid: 0,
            high_bidder: None,
        };
        assert_eq!(agent.bid(&view, &auction).unwrap(), Action::AuctionBid { amount: 7 });

        let offer = TradeOffer::new(
            SeatId::new(1),
            crate::core::TradeBundle::cash(5),
            crate::core::TradeBundle::cash(6),
        );
        assert!(matches!(
            agent.respond_to_trade(&view, &offer),
            Err(AgentError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_program_is_transport_error() {
        let result = ProcessModule::connect("process:/definitely/not/a/program");
        assert!(matches!(result, Err(AgentError::Transport(_))));
    }

    #[test]
    fn test_empty_command_is_unknown() {
        assert!(matches!(
            ProcessModule::connect("process:   "),
            Err(AgentError::UnknownModule(_))
        ));
    }
}
