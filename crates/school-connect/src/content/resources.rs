use std::cmp::Ordering;

use chrono::Utc;
use serde::Deserialize;

use super::domain::{
    BoardMember, BoardType, BreakingNews, ContactAddress, ContactLocation, ContactPageContent,
    ContactSubmission, HeroSlide, LeadershipMessage, PageContent, SchoolFeature, SchoolStats,
    SocialMediaLink, StaffCounts, Testimonial,
};
use crate::api::{Access, NoFilter, Resource, Viewer};
use crate::store::{SchoolStore, StoreError, Table};

pub struct HeroSlides;

impl Resource for HeroSlides {
    type Record = HeroSlide;
    type Filter = NoFilter;

    const PATH: &'static str = "hero-slides";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<HeroSlide> {
        &store.content.hero_slides
    }

    fn ordering(a: &HeroSlide, b: &HeroSlide) -> Ordering {
        a.order_index.cmp(&b.order_index)
    }

    fn visible(_: &SchoolStore, slide: &HeroSlide, _: &Viewer) -> Result<bool, StoreError> {
        Ok(slide.is_active)
    }
}

pub struct BreakingNewsItems;

impl Resource for BreakingNewsItems {
    type Record = BreakingNews;
    type Filter = NoFilter;

    const PATH: &'static str = "breaking-news";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<BreakingNews> {
        &store.content.breaking_news
    }

    fn ordering(a: &BreakingNews, b: &BreakingNews) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn visible(_: &SchoolStore, item: &BreakingNews, _: &Viewer) -> Result<bool, StoreError> {
        Ok(item.is_active && !item.is_expired(Utc::now()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageFilter {
    pub page_name: Option<String>,
}

pub struct PageContents;

impl Resource for PageContents {
    type Record = PageContent;
    type Filter = PageFilter;

    const PATH: &'static str = "page-content";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<PageContent> {
        &store.content.page_content
    }

    fn ordering(a: &PageContent, b: &PageContent) -> Ordering {
        a.page_name
            .cmp(&b.page_name)
            .then_with(|| a.section_name.cmp(&b.section_name))
    }

    fn visible(_: &SchoolStore, section: &PageContent, _: &Viewer) -> Result<bool, StoreError> {
        Ok(section.is_active)
    }

    fn matches(section: &PageContent, filter: &PageFilter) -> bool {
        filter
            .page_name
            .as_deref()
            .map_or(true, |page| section.page_name == page)
    }
}

pub struct SchoolFeatures;

impl Resource for SchoolFeatures {
    type Record = SchoolFeature;
    type Filter = NoFilter;

    const PATH: &'static str = "school-features";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<SchoolFeature> {
        &store.content.school_features
    }

    fn ordering(a: &SchoolFeature, b: &SchoolFeature) -> Ordering {
        a.order_index.cmp(&b.order_index)
    }

    fn visible(_: &SchoolStore, feature: &SchoolFeature, _: &Viewer) -> Result<bool, StoreError> {
        Ok(feature.is_active)
    }
}

pub struct SchoolStatistics;

impl Resource for SchoolStatistics {
    type Record = SchoolStats;
    type Filter = NoFilter;

    const PATH: &'static str = "school-stats";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<SchoolStats> {
        &store.content.school_stats
    }

    fn ordering(a: &SchoolStats, b: &SchoolStats) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

pub struct StaffCountEntries;

impl Resource for StaffCountEntries {
    type Record = StaffCounts;
    type Filter = NoFilter;

    const PATH: &'static str = "staff-counts";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<StaffCounts> {
        &store.content.staff_counts
    }

    fn ordering(a: &StaffCounts, b: &StaffCounts) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

pub struct Testimonials;

impl Resource for Testimonials {
    type Record = Testimonial;
    type Filter = NoFilter;

    const PATH: &'static str = "testimonials";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<Testimonial> {
        &store.content.testimonials
    }

    fn ordering(a: &Testimonial, b: &Testimonial) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }

    fn visible(_: &SchoolStore, testimonial: &Testimonial, _: &Viewer) -> Result<bool, StoreError> {
        Ok(testimonial.is_active)
    }
}

pub struct ContactSubmissions;

impl Resource for ContactSubmissions {
    type Record = ContactSubmission;
    type Filter = NoFilter;

    const PATH: &'static str = "contact-submissions";
    const ACCESS: Access = Access::SubmitOnly;

    fn table(store: &SchoolStore) -> &Table<ContactSubmission> {
        &store.content.contact_submissions
    }

    fn ordering(a: &ContactSubmission, b: &ContactSubmission) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}

pub struct SocialMediaLinks;

impl Resource for SocialMediaLinks {
    type Record = SocialMediaLink;
    type Filter = NoFilter;

    const PATH: &'static str = "social-media-links";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<SocialMediaLink> {
        &store.content.social_media_links
    }

    fn ordering(a: &SocialMediaLink, b: &SocialMediaLink) -> Ordering {
        a.order_index.cmp(&b.order_index)
    }

    fn visible(_: &SchoolStore, link: &SocialMediaLink, _: &Viewer) -> Result<bool, StoreError> {
        Ok(link.is_active)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BoardFilter {
    pub board_type: Option<BoardType>,
}

pub struct BoardMembers;

impl Resource for BoardMembers {
    type Record = BoardMember;
    type Filter = BoardFilter;

    const PATH: &'static str = "board-members";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<BoardMember> {
        &store.content.board_members
    }

    fn ordering(a: &BoardMember, b: &BoardMember) -> Ordering {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.name.cmp(&b.name))
    }

    fn visible(_: &SchoolStore, member: &BoardMember, _: &Viewer) -> Result<bool, StoreError> {
        Ok(member.is_active)
    }

    fn matches(member: &BoardMember, filter: &BoardFilter) -> bool {
        filter
            .board_type
            .map_or(true, |board| member.board_type == board)
    }
}

pub struct LeadershipMessages;

impl Resource for LeadershipMessages {
    type Record = LeadershipMessage;
    type Filter = NoFilter;

    const PATH: &'static str = "leadership-messages";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<LeadershipMessage> {
        &store.content.leadership_messages
    }

    fn ordering(a: &LeadershipMessage, b: &LeadershipMessage) -> Ordering {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.person_name.cmp(&b.person_name))
    }

    fn visible(
        _: &SchoolStore,
        message: &LeadershipMessage,
        _: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(message.is_active)
    }
}

pub struct ContactPageContents;

impl Resource for ContactPageContents {
    type Record = ContactPageContent;
    type Filter = NoFilter;

    const PATH: &'static str = "contact-page-content";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<ContactPageContent> {
        &store.content.contact_page_content
    }

    fn ordering(a: &ContactPageContent, b: &ContactPageContent) -> Ordering {
        a.display_order.cmp(&b.display_order)
    }

    fn visible(
        _: &SchoolStore,
        block: &ContactPageContent,
        _: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(block.is_active)
    }
}

pub struct ContactAddresses;

impl Resource for ContactAddresses {
    type Record = ContactAddress;
    type Filter = NoFilter;

    const PATH: &'static str = "contact-addresses";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<ContactAddress> {
        &store.content.contact_addresses
    }

    fn ordering(a: &ContactAddress, b: &ContactAddress) -> Ordering {
        a.display_order.cmp(&b.display_order)
    }

    fn visible(_: &SchoolStore, address: &ContactAddress, _: &Viewer) -> Result<bool, StoreError> {
        Ok(address.is_active)
    }
}

pub struct ContactLocations;

impl Resource for ContactLocations {
    type Record = ContactLocation;
    type Filter = NoFilter;

    const PATH: &'static str = "contact-locations";
    const ACCESS: Access = Access::Public;

    fn table(store: &SchoolStore) -> &Table<ContactLocation> {
        &store.content.contact_locations
    }

    fn ordering(a: &ContactLocation, b: &ContactLocation) -> Ordering {
        a.display_order.cmp(&b.display_order)
    }

    fn visible(
        _: &SchoolStore,
        location: &ContactLocation,
        _: &Viewer,
    ) -> Result<bool, StoreError> {
        Ok(location.is_active)
    }
}
