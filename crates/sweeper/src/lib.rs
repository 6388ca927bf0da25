pub mod api;
pub mod logic;

pub use api::{CastGateway, CastView, NeynarGateway, UpstreamApiError};
pub use logic::{
    delete_casts, parse_timestamp, search_casts, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE,
};
