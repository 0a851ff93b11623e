mod config;
mod domain;
mod frameworks;
mod interface_adapters;
mod use_cases;

#[tokio::main]
async fn main() {
    frameworks::server::run().await;
}
