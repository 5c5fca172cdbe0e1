#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    sketch_lambda_lib::run().await
}
