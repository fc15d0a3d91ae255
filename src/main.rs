use {
    paysync::{
        AppState,
        adapters::{
            flutterwave::FlutterwaveGateway,
            lygos::LygosGateway,
            mail::{DisabledReceiptSender, SmtpReceiptSender},
            mock::{CardMockGateway, MtnMockGateway},
            routes,
        },
        config::Config,
        domain::{notify::ReceiptSender, transaction::PaymentSource},
        infra::sqlite::transaction_store::TransactionStore,
        services::reconciliation::ReconciliationService,
    },
    sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    std::{str::FromStr, sync::Arc, time::Duration},
    tokio::signal,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("invalid DATABASE_URL")
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
        .expect("failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    let client = reqwest::Client::builder()
        .timeout(config.gateway_timeout)
        .build()
        .expect("failed to build http client");

    let receipts: Arc<dyn ReceiptSender> = match &config.smtp {
        Some(smtp) => Arc::new(
            SmtpReceiptSender::new(smtp).expect("failed to build smtp transport"),
        ),
        None => {
            tracing::info!("SMTP not configured, receipt mail disabled");
            Arc::new(DisabledReceiptSender)
        }
    };

    let service = ReconciliationService::new(TransactionStore::new(pool), receipts)
        .register_gateway(
            PaymentSource::Lygos,
            Arc::new(LygosGateway::new(
                client.clone(),
                config.lygos_api_key.clone(),
                config.lygos_base_url.clone(),
                config.front_url.clone(),
            )),
        )
        .register_gateway(
            PaymentSource::Flutterwave,
            Arc::new(FlutterwaveGateway::new(
                client,
                config.flw_secret_key.clone(),
                config.flw_base_url.clone(),
                config.front_url.clone(),
            )),
        )
        .register_gateway(PaymentSource::CardMock, Arc::new(CardMockGateway))
        .register_gateway(PaymentSource::MtnMock, Arc::new(MtnMockGateway));

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        service: Arc::new(service),
        config: Arc::new(config),
    };
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind listener");
    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
