mod support;

use predicates::str::contains;
use serde_json::{json, Value};

use support::TestStudio;

fn trail(value: &Value) -> Vec<(String, String)> {
    value["data"]
        .as_array()
        .map(|crumbs| {
            crumbs
                .iter()
                .map(|crumb| {
                    (
                        crumb["label"].as_str().unwrap_or_default().to_string(),
                        crumb["href"].as_str().unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn pair(label: &str, href: &str) -> (String, String) {
    (label.to_string(), href.to_string())
}

#[test]
fn crumbs_root_is_dashboard() -> Result<(), Box<dyn std::error::Error>> {
    let studio = TestStudio::new()?;
    let value = studio.json(&["crumbs", ""])?;
    assert_eq!(trail(&value), vec![pair("Dashboard", "/")]);
    Ok(())
}

#[test]
fn crumbs_use_lookups_file() -> Result<(), Box<dyn std::error::Error>> {
    let studio = TestStudio::new()?;
    let lookups = json!({
        "purchaseOrders": [{ "id": "PO123", "poNumber": "PO-0099" }],
        "invoices": [{ "id": "inv-1", "inNumber": "IN-0001" }],
        "users": [{ "id": "u7", "name": "Mia Chen" }]
    });
    let path = studio.write_file("lookups.json", &lookups.to_string())?;
    let path_arg = path.to_string_lossy().to_string();

    let po = studio.json(&["crumbs", "finance/purchase-order/PO123", "--lookups", &path_arg])?;
    assert_eq!(
        trail(&po),
        vec![
            pair("Finance", "/finance"),
            pair("purchase-order", "/finance/purchase-order"),
            pair("PO-0099", "/finance/purchase-order/PO123"),
        ]
    );

    let invoice = studio.json(&["crumbs", "finance/invoices/unknown-id", "--lookups", &path_arg])?;
    assert_eq!(
        trail(&invoice).last(),
        Some(&pair("Create Invoice", "/finance/invoices/unknown-id"))
    );

    let report = studio.json(&["crumbs", "/reports/productivity/u7", "--lookups", &path_arg])?;
    assert_eq!(trail(&report)[2].0, "Mia Chen");

    Ok(())
}

#[test]
fn crumbs_project_name_and_folders() -> Result<(), Box<dyn std::error::Error>> {
    let studio = TestStudio::new()?;

    let pending = studio.json(&["crumbs", "/projects/p1/folders/f2"])?;
    assert_eq!(trail(&pending)[1], pair("Loading…", "/projects/p1"));
    assert_eq!(trail(&pending)[2], pair("folders", "/projects/p1"));

    let named = studio.json(&[
        "crumbs",
        "/projects/p1/folders/f2",
        "--project-name",
        "Harbour Loft",
    ])?;
    assert_eq!(trail(&named)[1], pair("Harbour Loft", "/projects/p1"));
    assert_eq!(trail(&named)[3], pair("f2", "/projects/p1/folders/f2"));

    Ok(())
}

#[test]
fn crumbs_human_output_title_cases_labels() -> Result<(), Box<dyn std::error::Error>> {
    let studio = TestStudio::new()?;
    studio
        .cmd()
        .args(["crumbs", "/settings/team"])
        .assert()
        .success()
        .stdout(contains("Settings / Team"))
        .stdout(contains("team -> /settings/team"));
    Ok(())
}

#[test]
fn crumbs_ignore_board_config() -> Result<(), Box<dyn std::error::Error>> {
    let studio = TestStudio::new()?;
    studio.write_config("[board]\ncolumns = []\n")?;

    let value = studio.json(&["crumbs", "/folders/f9"])?;
    assert_eq!(
        trail(&value),
        vec![pair("folders", "/"), pair("f9", "/folders/f9")]
    );

    studio
        .cmd()
        .args(["board", "show", "loft"])
        .assert()
        .code(2);

    Ok(())
}

#[test]
fn crumbs_project_names_are_keyed() -> Result<(), Box<dyn std::error::Error>> {
    let studio = TestStudio::new()?;
    let lookups = json!({ "projects": [{ "id": "p1", "name": "Harbour Loft" }] });
    let path = studio.write_file("lookups.json", &lookups.to_string())?;
    let path_arg = path.to_string_lossy().to_string();

    let known = studio.json(&["crumbs", "/projects/p1", "--lookups", &path_arg])?;
    assert_eq!(trail(&known)[1], pair("Harbour Loft", "/projects/p1"));

    let other = studio.json(&["crumbs", "/projects/p2", "--lookups", &path_arg])?;
    assert_eq!(trail(&other)[1], pair("Loading…", "/projects/p2"));

    Ok(())
}
