//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: The frontier of URLs still to visit and the visited set
//! - `PageState`: How the visit of a page ended
//! - `DomainState`: Per-host request timing for the politeness delay

mod crawl_state;
mod domain_state;
mod page_state;

pub use crawl_state::CrawlState;
pub use domain_state::DomainState;
pub use page_state::PageState;
