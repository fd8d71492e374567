//! Wallet connection capability used by the presentation layer.
//!
//! The compositing engine never touches this module; it only consumes already-resolved image
//! sources. Presentation code drives a [`WalletProvider`] and reacts to its events.

use std::collections::BTreeMap;

use crate::foundation::error::{OverlayzError, OverlayzResult};

/// Ledger account identifier (e.g. `0.0.1234`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kinds of lifecycle notifications a provider emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WalletEventKind {
    /// A connection was established.
    Connect,
    /// The connection was dropped.
    Disconnect,
    /// The wallet's account list changed.
    AccountsChanged,
    /// The wallet switched networks.
    ChainChanged,
}

/// Lifecycle notification with its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    /// A connection was established.
    Connect {
        /// Account the session is bound to.
        account: AccountId,
    },
    /// The connection was dropped.
    Disconnect,
    /// The wallet's account list changed.
    AccountsChanged {
        /// New account list, first entry active.
        accounts: Vec<AccountId>,
    },
    /// The wallet switched networks.
    ChainChanged {
        /// New network name.
        chain: String,
    },
}

impl WalletEvent {
    /// Kind used to route the event to subscribers.
    pub fn kind(&self) -> WalletEventKind {
        match self {
            Self::Connect { .. } => WalletEventKind::Connect,
            Self::Disconnect => WalletEventKind::Disconnect,
            Self::AccountsChanged { .. } => WalletEventKind::AccountsChanged,
            Self::ChainChanged { .. } => WalletEventKind::ChainChanged,
        }
    }
}

/// Handle returned by [`WalletProvider::on_event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Event callback registered with [`WalletProvider::on_event`].
pub type WalletHandler = Box<dyn FnMut(&WalletEvent) + Send>;

/// Single wallet capability; one implementation per wallet SDK.
pub trait WalletProvider {
    /// Prepare the SDK; must be called before `connect`.
    fn init(&mut self) -> OverlayzResult<()>;
    /// Pair with the wallet and return the connected account.
    fn connect(&mut self) -> OverlayzResult<AccountId>;
    /// Drop the connection; a no-op when not connected.
    fn disconnect(&mut self) -> OverlayzResult<()>;
    /// Whether an account is connected.
    fn is_connected(&self) -> bool;
    /// Connected account, if any.
    fn account(&self) -> Option<&AccountId>;
    /// Register `handler` for events of `kind`.
    fn on_event(&mut self, kind: WalletEventKind, handler: WalletHandler) -> SubscriptionId;
    /// Drop a handler; `false` if it was not registered.
    fn off_event(&mut self, id: SubscriptionId) -> bool;
}

/// Scriptable provider with no external SDK, for tests and offline presentation.
pub struct InMemoryWallet {
    initialized: bool,
    accounts: Vec<AccountId>,
    chain: String,
    connected: Option<AccountId>,
    next_sub: u64,
    handlers: BTreeMap<SubscriptionId, (WalletEventKind, WalletHandler)>,
}

impl std::fmt::Debug for InMemoryWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryWallet")
            .field("initialized", &self.initialized)
            .field("accounts", &self.accounts)
            .field("chain", &self.chain)
            .field("connected", &self.connected)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl InMemoryWallet {
    /// Uninitialized wallet holding `accounts` on `chain`.
    pub fn new(accounts: Vec<AccountId>, chain: impl Into<String>) -> Self {
        Self {
            initialized: false,
            accounts,
            chain: chain.into(),
            connected: None,
            next_sub: 0,
            handlers: BTreeMap::new(),
        }
    }

    /// Current network name.
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// Simulate the user switching accounts inside the wallet.
    ///
    /// A connected wallet follows the first account; an empty list drops the connection and
    /// emits `Disconnect` after `AccountsChanged`.
    pub fn switch_accounts(&mut self, accounts: Vec<AccountId>) {
        self.accounts = accounts.clone();
        let was_connected = self.connected.is_some();
        if was_connected {
            self.connected = accounts.first().cloned();
        }
        let dropped = was_connected && self.connected.is_none();
        self.emit(&WalletEvent::AccountsChanged { accounts });
        if dropped {
            self.emit(&WalletEvent::Disconnect);
        }
    }

    /// Simulate a network switch.
    pub fn switch_chain(&mut self, chain: impl Into<String>) {
        self.chain = chain.into();
        let event = WalletEvent::ChainChanged {
            chain: self.chain.clone(),
        };
        self.emit(&event);
    }

    fn emit(&mut self, event: &WalletEvent) {
        let kind = event.kind();
        tracing::debug!(?kind, "wallet event");
        for (k, handler) in self.handlers.values_mut() {
            if *k == kind {
                handler(event);
            }
        }
    }
}

impl WalletProvider for InMemoryWallet {
    fn init(&mut self) -> OverlayzResult<()> {
        self.initialized = true;
        Ok(())
    }

    fn connect(&mut self) -> OverlayzResult<AccountId> {
        if !self.initialized {
            return Err(OverlayzError::initialization("wallet provider not initialized"));
        }
        if let Some(account) = &self.connected {
            return Ok(account.clone());
        }
        let account = self
            .accounts
            .first()
            .cloned()
            .ok_or_else(|| OverlayzError::validation("wallet has no accounts"))?;
        self.connected = Some(account.clone());
        self.emit(&WalletEvent::Connect {
            account: account.clone(),
        });
        Ok(account)
    }

    fn disconnect(&mut self) -> OverlayzResult<()> {
        if self.connected.take().is_some() {
            self.emit(&WalletEvent::Disconnect);
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    fn account(&self) -> Option<&AccountId> {
        self.connected.as_ref()
    }

    fn on_event(&mut self, kind: WalletEventKind, handler: WalletHandler) -> SubscriptionId {
        self.next_sub += 1;
        let id = SubscriptionId(self.next_sub);
        self.handlers.insert(id, (kind, handler));
        id
    }

    fn off_event(&mut self, id: SubscriptionId) -> bool {
        self.handlers.remove(&id).is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wallet/mod.rs"]
mod tests;
