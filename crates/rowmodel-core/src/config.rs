//! Connection configuration.
//!
//! Holds the parameters a driver needs to open a connection and renders
//! the MySQL-style DSN.

use std::collections::BTreeMap;
use std::fmt;

/// Parameters for establishing a database connection.
#[derive(Clone, Default)]
pub struct ConnectionConfig {
    /// Hostname or IP address of the database server.
    pub host: String,
    /// Port the server listens on.
    pub port: Option<u16>,
    /// Database name to select on connect.
    pub database: Option<String>,
    /// Unix socket path; usually exclusive with host/port.
    pub unix_socket: Option<String>,
    /// Character set.
    pub charset: Option<String>,
    /// Username used to authenticate.
    pub username: Option<String>,
    /// Password used to authenticate.
    password: Option<String>,
    /// Additional driver options.
    options: BTreeMap<String, String>,
}

impl ConnectionConfig {
    /// Configuration for the given host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Set the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the database name.
    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the unix socket path.
    #[must_use]
    pub fn unix_socket(mut self, path: impl Into<String>) -> Self {
        self.unix_socket = Some(path.into());
        self
    }

    /// Set the character set.
    #[must_use]
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Set the username.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Read the password back (drivers only; never logged).
    #[must_use]
    pub fn password_value(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Set an additional driver option.
    #[must_use]
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Read a driver option, with a fallback.
    #[must_use]
    pub fn option_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.options.get(name).map_or(default, String::as_str)
    }

    /// All additional driver options.
    #[must_use]
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Render the MySQL DSN: `mysql:host=..;port=..;dbname=..;`
    /// `unix_socket=..;charset=..`, omitting unset parts, with no trailing
    /// separator.
    #[must_use]
    pub fn mysql_dsn(&self) -> String {
        let mut parts = Vec::new();
        if !self.host.is_empty() {
            parts.push(format!("host={}", self.host));
        }
        if let Some(port) = self.port {
            parts.push(format!("port={port}"));
        }
        if let Some(database) = &self.database {
            parts.push(format!("dbname={database}"));
        }
        if let Some(socket) = &self.unix_socket {
            parts.push(format!("unix_socket={socket}"));
        }
        if let Some(charset) = &self.charset {
            parts.push(format!("charset={charset}"));
        }
        format!("mysql:{}", parts.join(";"))
    }
}

// Hand-written Debug: the password is masked.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("unix_socket", &self.unix_socket)
            .field("charset", &self.charset)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("options", &self.options)
            .finish()
    }
}
