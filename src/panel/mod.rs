// src/panel/mod.rs
pub mod payload;

pub use payload::{account_defaults, format_account, increment_tokens, user_defaults};

use anyhow::Result;
use tracing::{info, instrument};

use crate::api::{AbortRegistration, Api, ApiResult, Encoding, WriteContent};
use crate::config::{Config, Endpoints};
use crate::dsv::{parse_tsv, Record, Value};
use crate::table::TableState;
use crate::util::generate_password;

pub const ACCOUNT_KEY: &str = "id";
pub const USER_KEY: &str = "id_user";
/// Users list shows at most this many matches.
pub const USER_LIMIT: usize = 20;

/// Result of saving a user. New users get a generated password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedUser {
    pub reply: String,
    pub password: Option<String>,
}

/// Accounts and users tables wired to the API client.
#[derive(Debug)]
pub struct AdminPanel {
    api: Api,
    endpoints: Endpoints,
    accounts: TableState,
    users: TableState,
}

impl AdminPanel {
    pub fn new(api: Api, endpoints: Endpoints) -> Self {
        Self {
            api,
            endpoints,
            accounts: TableState::new(ACCOUNT_KEY),
            users: TableState::new(USER_KEY).with_limit(USER_LIMIT),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.build_api()?, config.endpoints.clone()))
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut Api {
        &mut self.api
    }

    pub fn accounts(&self) -> &TableState {
        &self.accounts
    }

    pub fn accounts_mut(&mut self) -> &mut TableState {
        &mut self.accounts
    }

    pub fn users(&self) -> &TableState {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut TableState {
        &mut self.users
    }

    /// Fetch and parse the accounts listing, replacing the table.
    #[instrument(level = "info", skip(self, cancel))]
    pub async fn load_accounts(&mut self, cancel: Option<AbortRegistration>) -> ApiResult<usize> {
        let text = self.api.read_text(&self.endpoints.accounts, cancel).await?;
        self.accounts.replace(parse_tsv(Some(&text)));
        info!(count = self.accounts.len(), "accounts loaded");
        Ok(self.accounts.len())
    }

    #[instrument(level = "info", skip(self, cancel))]
    pub async fn load_users(&mut self, cancel: Option<AbortRegistration>) -> ApiResult<usize> {
        let text = self.api.read_text(&self.endpoints.users, cancel).await?;
        self.users.replace(parse_tsv(Some(&text)));
        info!(count = self.users.len(), "users loaded");
        Ok(self.users.len())
    }

    /// Users matching `search`, scoped to the selected account if any.
    pub fn visible_users(&self, search: &str) -> Vec<&Record> {
        match self.accounts.selected().and_then(|a| a.get(ACCOUNT_KEY)) {
            Some(account_id) => self.users.filtered_where(search, "account", account_id),
            None => self.users.filtered(search),
        }
    }

    /// Persist an edited account, then update the local table.
    #[instrument(level = "info", skip(self, account))]
    pub async fn save_account(&mut self, account: Record) -> ApiResult<String> {
        let account = format_account(account);
        let reply = self
            .api
            .write(
                &self.endpoints.save_account,
                WriteContent::Fields(account.clone().into_fields()),
                Encoding::Form,
            )
            .await?;
        self.accounts.upsert(account);
        Ok(reply)
    }

    /// Persist a user. A user without an id is new: it is saved, then
    /// given a generated password under its email.
    #[instrument(level = "info", skip(self, user))]
    pub async fn save_user(&mut self, user: Record) -> ApiResult<SavedUser> {
        let is_new = user.get(USER_KEY).is_none();
        let reply = self
            .api
            .write(
                &self.endpoints.save_user,
                WriteContent::Fields(user.clone().into_fields()),
                Encoding::Form,
            )
            .await?;

        let password = match (is_new, user.get("email")) {
            (true, Some(Value::Text(email))) if !email.is_empty() => {
                Some(self.reset_password(email).await?)
            }
            _ => None,
        };

        self.users.upsert(user);
        Ok(SavedUser { reply, password })
    }

    /// Issue a fresh password for `username` and return it.
    #[instrument(level = "info", skip(self))]
    pub async fn reset_password(&self, username: &str) -> ApiResult<String> {
        let password = generate_password();
        self.api
            .write(
                &self.endpoints.reset_password,
                WriteContent::Fields(vec![
                    ("username".into(), Some(Value::from(username))),
                    ("password".into(), Some(Value::from(password.as_str()))),
                ]),
                Encoding::Form,
            )
            .await?;
        info!(username, "password reset");
        Ok(password)
    }
}
