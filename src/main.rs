// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use relational_mint_server::{
    api::router,
    auth::TokenService,
    clients::{HttpLedgerClient, HttpTransactionBuilder, Ledger, TransactionBuilder},
    config::Config,
    identity::{IdentityService, OneTimeCodeService, OsRngCodeSource},
    kyc::KycService,
    mint::{MintService, WalletService},
    notify::{LogMailer, Mailer},
    state::AppState,
    storage::{Database, LocalDocumentStore},
};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env().expect("Failed to load configuration");

    let db = Arc::new(Database::open(&config.database_path()).expect("Failed to open database"));

    let tokens = TokenService::with_ttls(
        config.jwt_secret.as_bytes(),
        config.access_ttl_secs,
        config.refresh_ttl_secs,
    );

    let txbuilder: Arc<dyn TransactionBuilder> = Arc::new(
        HttpTransactionBuilder::new(config.txbuilder_url.clone())
            .expect("Failed to build transaction-builder client"),
    );
    let ledger: Arc<dyn Ledger> = Arc::new(
        HttpLedgerClient::new(config.ledger_url.clone(), config.ledger_api_token.clone())
            .expect("Failed to build ledger client"),
    );
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);

    let codes = OneTimeCodeService::new(
        Arc::clone(&db),
        Arc::clone(&mailer),
        Arc::new(OsRngCodeSource),
    );
    let identity = IdentityService::new(
        Arc::clone(&db),
        tokens.clone(),
        codes,
        Arc::clone(&mailer),
    );
    let kyc = KycService::new(
        Arc::clone(&db),
        Arc::new(LocalDocumentStore::new(config.documents_dir())),
        Arc::clone(&mailer),
        config.admin_email.clone(),
    );
    let mints = MintService::new(Arc::clone(&db), txbuilder, ledger, Arc::clone(&mailer));
    let wallets = WalletService::new(Arc::clone(&db));

    let state = AppState {
        db,
        tokens,
        identity,
        kyc,
        mints,
        wallets,
    };
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, "Relational Mint server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    match env::var("LOG_FORMAT").as_deref() {
        Ok("json") => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        _ => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
