//! The client object tying configuration, transport and services together.
//!
//! # Design
//! `Client` is built once by the caller and shared by reference. It holds
//! no mutable state: every operation builds its request from the immutable
//! resource path and the caller's parameters, so concurrent use needs no
//! locking as long as the transport itself is shareable.

use crate::config::ClientConfig;
use crate::transport::Transport;
use crate::users::{UserService, Users};

pub struct Client<T> {
    config: ClientConfig,
    transport: T,
    users: UserService,
}

impl<T: Transport> Client<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        let users = UserService::new(config.base_url());
        Self {
            config,
            transport,
            users,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Operations on the `users/*` resource family.
    pub fn users(&self) -> Users<'_, T> {
        Users::new(&self.users, &self.transport)
    }
}

#[cfg(feature = "ureq")]
impl Client<crate::transport::UreqTransport> {
    /// A client over a default `ureq` transport, configured from the
    /// environment.
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env(), crate::transport::UreqTransport::new())
    }
}
