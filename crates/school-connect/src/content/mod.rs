//! Public site content: slides, tickers, page sections, leadership and contact details.

mod domain;
mod resources;

use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::{resource_routes, ApiState};
use crate::store::{tally, CountRows, RowCounts, StoreError, Table};

pub use domain::{
    BoardMember, BoardType, BreakingNews, ContactAddress, ContactLocation, ContactPageContent,
    ContactSubmission, ContentType, HeroSlide, LeaderPosition, LeadershipMessage, PageContent,
    Platform, SchoolFeature, SchoolStats, SocialMediaLink, StaffCounts, Testimonial,
};
pub use resources::{
    BoardMembers, BreakingNewsItems, ContactAddresses, ContactLocations, ContactPageContents,
    ContactSubmissions, HeroSlides, LeadershipMessages, PageContents, SchoolFeatures,
    SchoolStatistics, SocialMediaLinks, StaffCountEntries, Testimonials,
};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTables {
    pub hero_slides: Table<HeroSlide>,
    pub breaking_news: Table<BreakingNews>,
    pub page_content: Table<PageContent>,
    pub school_features: Table<SchoolFeature>,
    pub school_stats: Table<SchoolStats>,
    pub staff_counts: Table<StaffCounts>,
    pub testimonials: Table<Testimonial>,
    pub contact_submissions: Table<ContactSubmission>,
    pub social_media_links: Table<SocialMediaLink>,
    pub board_members: Table<BoardMember>,
    pub leadership_messages: Table<LeadershipMessage>,
    pub contact_page_content: Table<ContactPageContent>,
    pub contact_addresses: Table<ContactAddress>,
    pub contact_locations: Table<ContactLocation>,
}

impl CountRows for ContentTables {
    fn count_rows(&self, counts: &mut RowCounts) -> Result<(), StoreError> {
        tally(counts, &self.hero_slides)?;
        tally(counts, &self.breaking_news)?;
        tally(counts, &self.page_content)?;
        tally(counts, &self.school_features)?;
        tally(counts, &self.school_stats)?;
        tally(counts, &self.staff_counts)?;
        tally(counts, &self.testimonials)?;
        tally(counts, &self.contact_submissions)?;
        tally(counts, &self.social_media_links)?;
        tally(counts, &self.board_members)?;
        tally(counts, &self.leadership_messages)?;
        tally(counts, &self.contact_page_content)?;
        tally(counts, &self.contact_addresses)?;
        tally(counts, &self.contact_locations)
    }
}

pub fn router() -> Router<ApiState> {
    Router::new()
        .merge(resource_routes::<HeroSlides>())
        .merge(resource_routes::<BreakingNewsItems>())
        .merge(resource_routes::<PageContents>())
        .merge(resource_routes::<SchoolFeatures>())
        .merge(resource_routes::<SchoolStatistics>())
        .merge(resource_routes::<StaffCountEntries>())
        .merge(resource_routes::<Testimonials>())
        .merge(resource_routes::<ContactSubmissions>())
        .merge(resource_routes::<SocialMediaLinks>())
        .merge(resource_routes::<BoardMembers>())
        .merge(resource_routes::<LeadershipMessages>())
        .merge(resource_routes::<ContactPageContents>())
        .merge(resource_routes::<ContactAddresses>())
        .merge(resource_routes::<ContactLocations>())
}
