//! Built-in SocialFlow Pro scenario list

use chrono::{DateTime, Duration, Local};
use serde_json::{json, Map, Value};

use super::{Check, Probe, ProbeMode, Scenario, Shape};
use crate::client::RequestSpec;
use crate::utils::config::Config;

const PUBLISH_CONTENT: &str = "🚀 Testing our amazing API! This post was created via automated \
testing. #APITesting #SocialFlow";
const SCHEDULE_CONTENT: &str = "📅 This is a scheduled post created by our API testing suite! \
Will be published tomorrow. #Scheduled #Testing";
const UPLOAD_IMAGE: &str = "https://images.unsplash.com/photo-1611224923853-80b023f02d71";
const SAMPLE_IMAGE: &str =
    "https://images.unsplash.com/photo-1611224923853-80b023f02d71?w=400&h=400&fit=crop";

pub const ANALYTICS_TIMEFRAMES: [&str; 3] = ["7", "30", "90"];

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn echo_of(body: &Value, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|f| body.get(*f).map(|v| (f.to_string(), v.clone())))
        .collect()
}

fn posts_list() -> Check {
    Check::Entity {
        container: "posts".to_string(),
        shape: Shape::List { non_empty: false },
        required: vec![],
        report: vec![],
    }
}

fn analytics() -> Check {
    Check::Entity {
        container: "analytics".to_string(),
        shape: Shape::Object,
        required: keys(&["overview", "engagement", "platforms", "topPosts"]),
        report: keys(&["overview.totalPosts", "overview.totalReach"]),
    }
}

pub fn profile_update_body() -> Value {
    json!({
        "businessName": "Test Restaurant API",
        "businessType": "restaurant",
        "address": "123 Test Street, Test City",
        "phone": "(555) 999-8888",
        "email": "test@testrestaurant.com",
        "connectedAccounts": {
            "instagram": {"connected": true, "username": "@testrestaurant"},
            "facebook": {"connected": false, "username": null}
        }
    })
}

pub fn publish_post_body() -> Value {
    json!({
        "content": PUBLISH_CONTENT,
        "platforms": ["instagram", "facebook"],
        "action": "publish",
        "images": [SAMPLE_IMAGE]
    })
}

pub fn schedule_post_body(now: DateTime<Local>) -> Value {
    json!({
        "content": SCHEDULE_CONTENT,
        "platforms": ["instagram"],
        "action": "schedule",
        "scheduledAt": (now + Duration::days(1)).to_rfc3339(),
        "images": []
    })
}

pub fn image_upload_body() -> Value {
    json!({
        "filename": "test-api-upload.jpg",
        "url": format!("{}?w=800&h=600&fit=crop", UPLOAD_IMAGE),
        "thumbnail": format!("{}?w=200&h=200&fit=crop", UPLOAD_IMAGE),
        "category": "API Testing"
    })
}

/// The full suite in execution order. `now` anchors the scheduled post's date.
pub fn socialflow_suite(config: &Config, now: DateTime<Local>) -> Vec<Scenario> {
    let profile = profile_update_body();
    let publish = publish_post_body();
    let schedule = schedule_post_body(now);
    let image = image_upload_body();

    vec![
        Scenario::single(
            "Root API Connectivity",
            RequestSpec::get("/"),
            Check::Marker {
                field: "message".to_string(),
                marker: config.connectivity_marker(),
                report: Some("version".to_string()),
            },
        ),
        Scenario::probes(
            "Database Connection",
            ProbeMode::EvaluateAll,
            vec![
                Probe::new(
                    "Profile DB Connection",
                    RequestSpec::get("/profile"),
                    Check::Reachable,
                ),
                Probe::new(
                    "Posts DB Connection",
                    RequestSpec::get("/posts"),
                    Check::Reachable,
                ),
            ],
        ),
        Scenario::single(
            "User Profile GET",
            RequestSpec::get("/profile"),
            Check::Entity {
                container: "profile".to_string(),
                shape: Shape::Object,
                required: keys(&["id", "businessName", "businessType", "connectedAccounts"]),
                report: keys(&["businessName"]),
            },
        ),
        Scenario::single(
            "User Profile POST",
            RequestSpec::post("/profile", profile.clone()),
            Check::Created {
                container: "profile".to_string(),
                echo: echo_of(&profile, &["businessName"]),
                expected_status: None,
                require_id: false,
            },
        ),
        Scenario::single("Posts GET All", RequestSpec::get("/posts"), posts_list()),
        Scenario::probes(
            "Posts GET Filtered",
            ProbeMode::StopAtFirstFailure,
            vec![
                Probe::new(
                    "Published",
                    RequestSpec::get("/posts").with_query("status", "published"),
                    posts_list(),
                ),
                Probe::new(
                    "Scheduled",
                    RequestSpec::get("/posts").with_query("status", "scheduled"),
                    posts_list(),
                ),
            ],
        ),
        Scenario::single(
            "Posts CREATE Publish",
            RequestSpec::post("/posts", publish.clone()),
            Check::Created {
                container: "post".to_string(),
                echo: echo_of(&publish, &["content"]),
                expected_status: Some("published".to_string()),
                require_id: true,
            },
        ),
        Scenario::single(
            "Posts CREATE Schedule",
            RequestSpec::post("/posts", schedule.clone()),
            Check::Created {
                container: "post".to_string(),
                echo: echo_of(&schedule, &["content"]),
                expected_status: Some("scheduled".to_string()),
                require_id: true,
            },
        ),
        Scenario::single("Analytics Default", RequestSpec::get("/analytics"), analytics()),
        Scenario::sweep(
            "Analytics Timeframes",
            "timeframe",
            &ANALYTICS_TIMEFRAMES,
            RequestSpec::get("/analytics"),
            analytics(),
        ),
        Scenario::single(
            "Image Library",
            RequestSpec::get("/images"),
            Check::Entity {
                container: "images".to_string(),
                shape: Shape::List { non_empty: true },
                required: keys(&["id", "filename", "url", "thumbnail", "category"]),
                report: vec![],
            },
        ),
        Scenario::single(
            "Image Upload",
            RequestSpec::post("/images/upload", image.clone()),
            Check::Created {
                container: "image".to_string(),
                echo: echo_of(&image, &["filename"]),
                expected_status: None,
                require_id: true,
            },
        ),
        Scenario::probes(
            "Error Handling",
            ProbeMode::EvaluateAll,
            vec![
                Probe::new(
                    "404 for invalid endpoint",
                    RequestSpec::get("/invalid-endpoint"),
                    Check::Status(404),
                ),
                Probe::new(
                    "JSON error response",
                    RequestSpec::post("/posts", json!({"invalid": "data"})),
                    Check::ErrorResponse,
                )
                .advisory(),
            ],
        ),
    ]
}
