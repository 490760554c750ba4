use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;
use tokio::sync::Mutex;

use checkin_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::GoogleSheetsClient,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // JWT 服务
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // Google Sheets 客户端 (未配置时同步功能停用)
    let sheets_client = GoogleSheetsClient::new(config.google_sheets.clone());
    if !sheets_client.is_configured() {
        log::warn!("Google Sheets is not configured, member mirroring disabled");
    }
    let sheets_client = Arc::new(Mutex::new(sheets_client));

    // 业务服务
    let auth_service = AuthService::new(jwt_service.clone(), config.admin.password_hash.clone());
    let member_service = MemberService::new(pool.clone());
    let meeting_service = MeetingService::new(pool.clone());
    let checkin_service = CheckinService::new(pool.clone());
    let prize_service = PrizeService::new(pool.clone());
    let lottery_service = LotteryService::new(pool.clone());
    let sync_service = SyncService::new(pool.clone(), sheets_client.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(member_service.clone()))
            .app_data(web::Data::new(meeting_service.clone()))
            .app_data(web::Data::new(checkin_service.clone()))
            .app_data(web::Data::new(prize_service.clone()))
            .app_data(web::Data::new(lottery_service.clone()))
            .app_data(web::Data::new(sync_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .configure(handlers::member_config)
                    .configure(handlers::checkin_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
