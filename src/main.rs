use infra_architect::{logging, run_cli, Credentials};

#[tokio::main]
async fn main() {
    // 与 `--env-file=.env` 等价，文件不存在时忽略
    dotenvy::dotenv().ok();
    logging::init();

    // 凭证缺失时在构造任何 agent / 工具之前退出
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_cli(credentials).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
