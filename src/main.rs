use list_relay::{config::get_or_init_config, App, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // We have a different logging mechanism for production
    #[cfg(not(debug_assertions))]
    {
        list_relay::init_production_tracing()
    }
    #[cfg(debug_assertions)]
    {
        list_relay::init_dbg_tracing();
    }

    let config = get_or_init_config();
    let app = App::build_from_config(config).await?;

    list_relay::serve(app).await?;

    Ok(())
}
