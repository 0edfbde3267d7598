use redis::aio::{ConnectionLike, ConnectionManager, ConnectionManagerConfig};
use redis::{IntoConnectionInfo, RedisError, RedisResult, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::status::{ConnectionEvent, ConnectionStatus, StatusCell};

/// A single command issued against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    Ping,
    Set { key: String, value: String },
    Get { key: String },
    Increment { key: String },
}

impl StoreCommand {
    pub fn name(&self) -> &'static str {
        match self {
            StoreCommand::Ping => "PING",
            StoreCommand::Set { .. } => "SET",
            StoreCommand::Get { .. } => "GET",
            StoreCommand::Increment { .. } => "INCR",
        }
    }

    /// Wire form of the command
    pub fn to_cmd(&self) -> redis::Cmd {
        let mut cmd = redis::cmd(self.name());
        match self {
            StoreCommand::Ping => {}
            StoreCommand::Set { key, value } => {
                cmd.arg(key.as_str()).arg(value.as_str());
            }
            StoreCommand::Get { key } | StoreCommand::Increment { key } => {
                cmd.arg(key.as_str());
            }
        }
        cmd
    }

    fn parse_reply(&self, value: &Value) -> RedisResult<StoreReply> {
        match self {
            StoreCommand::Ping => redis::from_redis_value::<String>(value).map(StoreReply::Pong),
            StoreCommand::Set { .. } => redis::from_redis_value::<()>(value).map(|()| StoreReply::Ok),
            StoreCommand::Get { .. } => {
                redis::from_redis_value::<Option<String>>(value).map(StoreReply::Value)
            }
            StoreCommand::Increment { .. } => {
                redis::from_redis_value::<i64>(value).map(StoreReply::Integer)
            }
        }
    }
}

/// Typed reply to a [`StoreCommand`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreReply {
    Pong(String),
    Ok,
    Value(Option<String>),
    Integer(i64),
}

#[derive(Debug)]
pub enum StoreError {
    /// Error raised by the Redis client or server
    Redis(RedisError),
    /// Reply shape did not match the command
    UnexpectedReply {
        command: &'static str,
        reply: StoreReply,
    },
}

impl StoreError {
    /// True when the failure came from the transport rather than the server
    pub fn is_transport(&self) -> bool {
        match self {
            StoreError::Redis(err) => is_transport_error(err),
            StoreError::UnexpectedReply { .. } => false,
        }
    }
}

/// Server replies are shown as the server sent them (`ERR value is not an
/// integer or out of range`); client-side failures use the client's message.
impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Redis(err) => match (err.code(), err.detail()) {
                (Some(code), Some(detail)) if !is_transport_error(err) => {
                    write!(f, "{} {}", code, detail)
                }
                _ => write!(f, "{}", err),
            },
            StoreError::UnexpectedReply { command, reply } => {
                write!(f, "unexpected reply to {}: {:?}", command, reply)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Redis(err) => Some(err),
            StoreError::UnexpectedReply { .. } => None,
        }
    }
}

impl From<RedisError> for StoreError {
    fn from(err: RedisError) -> Self {
        StoreError::Redis(err)
    }
}

fn is_transport_error(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout()
}

/// Shareable Redis client for use across async handlers
///
/// Holds one multiplexed connection that every request clones. The
/// connection is established by [`StoreClient::connect`]; while it has never
/// been established, each operation makes one fresh attempt, and concurrent
/// callers wait on the same attempt. After that the connection manager
/// re-establishes dropped links on its own.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<Inner>,
}

struct Inner {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
    status: StatusCell,
    connect_timeout: Duration,
}

impl StoreClient {
    /// Create a client from configuration without connecting
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let mut info = config.redis_url().into_connection_info()?;
        if !config.redis_password.is_empty() {
            info.redis.password = Some(config.redis_password.clone());
        }

        let client = redis::Client::open(info)?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                connection: OnceCell::new(),
                status: StatusCell::new(),
                connect_timeout: config.redis_connect_timeout,
            }),
        })
    }

    /// Establish the shared connection
    ///
    /// Moves the status through `Connecting` to `Ready`, or back to
    /// `Disconnected` on failure. Callers decide whether a failure is fatal.
    pub async fn connect(&self) -> Result<(), StoreError> {
        self.connection().await.map(|_| ())
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.status.get()
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Ready
    }

    async fn connection(&self) -> Result<ConnectionManager, StoreError> {
        let inner = &self.inner;
        let manager = inner
            .connection
            .get_or_try_init(|| async {
                inner.status.transition(ConnectionEvent::ConnectAttempt);

                // A single try: every waiter sits on this attempt, and the next
                // operation is the retry.
                let manager_config = ConnectionManagerConfig::new()
                    .set_number_of_retries(0)
                    .set_connection_timeout(inner.connect_timeout);

                match ConnectionManager::new_with_config(inner.client.clone(), manager_config).await
                {
                    Ok(manager) => {
                        inner.status.transition(ConnectionEvent::Ready);
                        Ok(manager)
                    }
                    Err(err) => {
                        inner.status.transition(ConnectionEvent::TransportError);
                        Err(StoreError::from(err))
                    }
                }
            })
            .await?;

        Ok(manager.clone())
    }

    /// Run one command on the shared connection
    pub async fn execute(&self, command: StoreCommand) -> Result<StoreReply, StoreError> {
        let mut conn = self.connection().await?;

        // A command sent while disconnected is what drives the manager to
        // reconnect; Ready is left untouched.
        self.inner.status.transition(ConnectionEvent::ConnectAttempt);
        let generation = self.inner.status.generation();

        let result = conn
            .req_packed_command(&command.to_cmd())
            .await
            .and_then(|value| command.parse_reply(&value));

        self.observe(&result, generation);

        match &result {
            Ok(reply) => tracing::debug!(command = command.name(), ?reply, "Store command succeeded"),
            Err(err) => tracing::debug!(command = command.name(), error = %err, "Store command failed"),
        }

        result.map_err(StoreError::from)
    }

    /// Feed a command outcome back into the connection status
    fn observe<T>(&self, result: &RedisResult<T>, generation: u64) {
        match result {
            Ok(_) => {
                self.inner
                    .status
                    .transition_from(ConnectionEvent::Ready, generation);
            }
            Err(err) if is_transport_error(err) => {
                self.inner.status.transition(ConnectionEvent::TransportError);
            }
            // Server replies such as a failed INCR prove the link works.
            Err(_) => {
                self.inner
                    .status
                    .transition_from(ConnectionEvent::Ready, generation);
            }
        }
    }

    pub async fn ping(&self) -> Result<String, StoreError> {
        match self.execute(StoreCommand::Ping).await? {
            StoreReply::Pong(pong) => Ok(pong),
            reply => Err(StoreError::UnexpectedReply { command: "PING", reply }),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let command = StoreCommand::Set {
            key: key.to_string(),
            value: value.to_string(),
        };
        match self.execute(command).await? {
            StoreReply::Ok => Ok(()),
            reply => Err(StoreError::UnexpectedReply { command: "SET", reply }),
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.execute(StoreCommand::Get { key: key.to_string() }).await? {
            StoreReply::Value(value) => Ok(value),
            reply => Err(StoreError::UnexpectedReply { command: "GET", reply }),
        }
    }

    pub async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        match self
            .execute(StoreCommand::Increment { key: key.to_string() })
            .await?
        {
            StoreReply::Integer(value) => Ok(value),
            reply => Err(StoreError::UnexpectedReply { command: "INCR", reply }),
        }
    }
}
