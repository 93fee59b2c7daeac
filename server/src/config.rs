// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};

/// Which `TaskStore` implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// SQLite database at `--database-url`
    Sqlite,
    /// Process memory, lost on exit
    Memory,
}

/// Server configuration, from command-line flags or environment variables.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server")]
#[command(about = "REST backend for the to-do list")]
pub struct Config {
    /// Database connection URL
    #[arg(long, env = "TODO_DATABASE_URL", default_value = "sqlite://todos.db")]
    pub database_url: String,

    /// Address to listen on
    #[arg(long, env = "TODO_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port for the HTTP API
    #[arg(short, long, env = "TODO_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Storage backend
    #[arg(long, env = "TODO_STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
