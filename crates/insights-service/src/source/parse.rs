//! Mapping from LinkedIn JSON payloads to source records.
//!
//! Payloads are walked as `serde_json::Value` because every field is
//! optional and several are nested several levels deep.

use super::{SourceComment, SourceEmployee, SourceOrganization, SourcePost};
use chrono::{DateTime, TimeZone, Utc};
use insights_core::text::{extract_hashtags, extract_mentions};
use serde_json::Value as JsonValue;

const COMPANY_URL: &str = "https://www.linkedin.com/company";
const PROFILE_URL: &str = "https://www.linkedin.com/in";

fn string_at(value: &JsonValue, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(JsonValue::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn i64_at(value: &JsonValue, pointer: &str) -> i64 {
    value.pointer(pointer).and_then(JsonValue::as_i64).unwrap_or(0)
}

/// Ids arrive as numbers or strings depending on the endpoint.
fn id_of(value: &JsonValue) -> Option<String> {
    match value.get("id")? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `{"localized": {"en_US": "..."}}`
fn localized(value: &JsonValue, field: &str) -> Option<String> {
    string_at(value, &format!("/{field}/localized/en_US"))
}

fn timestamp_ms(value: &JsonValue, pointer: &str) -> Option<DateTime<Utc>> {
    let millis = value.pointer(pointer).and_then(JsonValue::as_i64)?;
    Utc.timestamp_millis_opt(millis).single()
}

/// First identifier of the widest rendition in a digital media asset.
fn largest_image(asset: Option<&JsonValue>, elements_key: &str) -> Option<String> {
    asset?
        .get(elements_key)?
        .get("elements")?
        .as_array()?
        .iter()
        .max_by_key(|e| i64_at(e, "/data/width"))
        .and_then(|e| string_at(e, "/identifiers/0/identifier"))
}

pub(crate) fn company_size(range: Option<&JsonValue>) -> Option<String> {
    let range = range?;
    let start = range.get("start").and_then(JsonValue::as_i64).unwrap_or(0);
    match range.get("end").and_then(JsonValue::as_i64) {
        Some(end) if end > 0 => Some(format!("{start}-{end}")),
        _ => Some(format!("{start}+")),
    }
}

pub(crate) fn headquarters(locations: &[JsonValue]) -> Option<String> {
    let hq = locations.iter().find(|l| {
        l.get("isHeadquarters")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false)
    })?;
    let city = string_at(hq, "/city");
    let country = string_at(hq, "/country");
    match (city, country) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (city, country) => city.or(country),
    }
}

fn industry(industries: Option<&JsonValue>) -> Option<String> {
    match industries?.as_array()?.first()? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

pub(crate) fn parse_organization(
    org: &JsonValue,
    requested_slug: &str,
    follower_count: i64,
) -> Option<SourceOrganization> {
    let linkedin_id = id_of(org)?;
    let vanity_name = string_at(org, "/vanityName").unwrap_or_else(|| requested_slug.to_string());
    let name = string_at(org, "/localizedName")
        .or_else(|| string_at(org, "/name/localized/en_US"))
        .or_else(|| string_at(org, "/name"))
        .unwrap_or_else(|| vanity_name.clone());

    let locations: Vec<JsonValue> = org
        .get("locations")
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default();

    let specialties = org
        .get("specialties")
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(SourceOrganization {
        url: format!("{COMPANY_URL}/{vanity_name}"),
        description: string_at(org, "/localizedDescription")
            .or_else(|| string_at(org, "/description/localized/en_US"))
            .or_else(|| string_at(org, "/description")),
        website: localized(org, "website"),
        industry: industry(org.get("industries")),
        company_size: company_size(org.get("staffCountRange")),
        headquarters: headquarters(&locations),
        founded_year: org
            .pointer("/foundedOn/year")
            .and_then(JsonValue::as_i64)
            .and_then(|y| i32::try_from(y).ok()),
        company_type: string_at(org, "/organizationType"),
        specialties,
        locations,
        logo_url: largest_image(org.get("logoV2"), "cropped~"),
        follower_count,
        linkedin_id,
        vanity_name,
        name,
    })
}

/// `elements[0].followerCounts.organicFollowerCount` of the statistics call.
pub(crate) fn follower_count(stats: &JsonValue) -> i64 {
    i64_at(stats, "/elements/0/followerCounts/organicFollowerCount")
}

pub(crate) fn parse_post(element: &JsonValue) -> Option<SourcePost> {
    let post_id = id_of(element)?;
    let share = element
        .pointer("/specificContent/com.linkedin.ugc.ShareContent")
        .cloned()
        .unwrap_or(JsonValue::Null);

    let text = string_at(&share, "/shareCommentary/text");
    let media = share.pointer("/media/0");
    let media_type = media.and_then(|m| string_at(m, "/mediaType"));
    let media_url = media.and_then(|m| {
        string_at(m, "/originalUrl").or_else(|| string_at(m, "/thumbnails/0/url"))
    });

    let content_type = string_at(&share, "/shareMediaCategory")
        .map_or_else(|| "text".to_string(), |c| c.to_lowercase());

    let body = text.as_deref().unwrap_or("");
    Some(SourcePost {
        hashtags: extract_hashtags(body),
        mentions: extract_mentions(body),
        post_id,
        content_type,
        media_url,
        media_type,
        posted_at: timestamp_ms(element, "/created/time"),
        like_count: i64_at(element, "/socialDetail/totalLikes"),
        comment_count: i64_at(element, "/socialDetail/totalComments"),
        share_count: i64_at(element, "/socialDetail/totalShares"),
        text,
    })
}

pub(crate) fn parse_comment(element: &JsonValue) -> Option<SourceComment> {
    Some(SourceComment {
        comment_id: id_of(element)?,
        parent_comment_id: string_at(element, "/parentComment"),
        text: string_at(element, "/message/text"),
        author_id: string_at(element, "/actor"),
        like_count: i64_at(element, "/likesSummary/totalLikes"),
        commented_at: timestamp_ms(element, "/created/time"),
    })
}

pub(crate) fn parse_employee(element: &JsonValue) -> Option<SourceEmployee> {
    Some(SourceEmployee {
        linkedin_id: id_of(element)?,
        first_name: localized(element, "firstName"),
        last_name: localized(element, "lastName"),
        headline: localized(element, "headline"),
        profile_url: string_at(element, "/vanityName").map(|v| format!("{PROFILE_URL}/{v}")),
        profile_picture_url: largest_image(element.get("profilePicture"), "displayImage~"),
        location: string_at(element, "/location/name"),
        industry: string_at(element, "/industry"),
    })
}

/// Applies `parse` to every entry of `elements`, skipping unparsable ones.
pub(crate) fn parse_elements<T>(payload: &JsonValue, parse: fn(&JsonValue) -> Option<T>) -> Vec<T> {
    payload
        .get("elements")
        .and_then(JsonValue::as_array)
        .map(|elements| elements.iter().filter_map(parse).collect())
        .unwrap_or_default()
}
