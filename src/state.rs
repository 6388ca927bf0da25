use sweeper::NeynarGateway;

pub type SharedState = AppState;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub gateway: NeynarGateway,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the upstream API; the gateway is built from this.
    pub neynar_api_url: String,
    /// Casts requested per page when walking a user's history.
    pub page_size: usize,
    /// Hard cap on pages per search.
    pub max_pages: usize,
}
