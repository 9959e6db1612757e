use std::net::SocketAddr;

use anyhow::Context;
use eurosign_client::{Credentials, TokenClient};

use super::{CLIENT_ID, CLIENT_SECRET, MockEurosign};

#[derive(Debug)]
pub struct TestApp {
    pub mock: MockEurosign,
    pub client: TokenClient,
    pub credentials: Credentials,
    addr: SocketAddr,
}

impl TestApp {
    pub async fn start() -> anyhow::Result<Self> {
        let mock = MockEurosign::default();
        let addr = mock.launch().await?;
        let client = client_for(addr, "")?;

        Ok(Self {
            mock,
            client,
            credentials: Credentials::new(CLIENT_ID, CLIENT_SECRET),
            addr,
        })
    }

    /// A client whose endpoints answer with garbage.
    pub fn broken_client(&self) -> anyhow::Result<TokenClient> {
        client_for(self.addr, "/broken")
    }

    /// A client whose endpoints answer `401` with an empty body.
    pub fn bare_client(&self) -> anyhow::Result<TokenClient> {
        client_for(self.addr, "/bare")
    }

    /// Issues a fresh authorization code and exchanges it.
    pub async fn obtain_tokens(
        &self,
        code: &str,
    ) -> anyhow::Result<eurosign_client::AccessTokenResponse> {
        self.mock.issue_authorization_code(code);
        let tokens = self
            .client
            .obtain_access_token(&self.credentials, code)
            .await?;
        Ok(tokens)
    }
}

fn client_for(addr: SocketAddr, prefix: &str) -> anyhow::Result<TokenClient> {
    // no system proxy between tests and the local mock
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .context("build HTTP client")?;

    let client = TokenClient::builder()
        .with_token_url(format!("http://{addr}{prefix}/oauth/token"))?
        .with_api_base_url(format!("http://{addr}{prefix}/v2"))?
        .with_client(http)
        .build()?;
    Ok(client)
}
