//! First-boot catalog fixtures.
//!
//! On startup, if the `apps` table is empty, a fixed set of example entries
//! is inserted in a fixed order. Individual insert failures are logged and
//! skipped so the service still comes up with a partial catalog.
//!
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::crud;
use crate::db::models::NewApp;

/// Populate an empty catalog with the example entries. Does nothing when the
/// table already has rows, so re-running it is always safe.
pub(crate) async fn seed_apps(pool: &SqlitePool) {
    let count = match crud::count_apps(pool).await {
        Ok(count) => count,
        Err(err) => {
            warn!(error = %err, "count apps before seeding");
            return;
        }
    };
    if count > 0 {
        return;
    }

    let entries = seed_entries();
    let total = entries.len();
    for app in entries {
        if let Err(err) = crud::create_app(pool, &app).await {
            warn!(title = %app.title, error = %err, "seed app");
        }
    }
    info!(total, "seeded example catalog");
}

fn entry(
    url: &str,
    title: &str,
    description: &str,
    thumbnail: &str,
    sort_order: i64,
    prompt: &str,
) -> NewApp {
    NewApp {
        url: url.into(),
        title: title.into(),
        description: description.into(),
        thumbnail: Some(thumbnail.into()),
        sort_order: Some(sort_order),
        prompt: Some(prompt.into()),
    }
}

fn seed_entries() -> Vec<NewApp> {
    vec![
        entry(
            "https://holzeinschlag-at.exe.xyz/",
            "Holzeinschlag Österreich",
            "Forest loss & carbon emissions by municipality. Satellite-derived harvest data 2001-2024 with ETS carbon pricing.",
            "/static/thumbs/holzeinschlag.jpg",
            1,
            "Map Austria's forest harvest by municipality using Hansen satellite data. Calculate timber volume from tree cover loss, add carbon emissions and ETS liability at current prices. Let users select years and combine municipalities.",
        ),
        entry(
            "https://groundwater-at.exe.xyz/",
            "Drought Risk Map",
            "Groundwater levels meet hydropower. Municipality drought risk from 2,118 stations and 156 power plants.",
            "/static/thumbs/groundwater.jpg",
            2,
            "Build a drought risk map for Austria combining groundwater monitoring stations with hydropower plant locations. Show which municipalities face water stress based on declining groundwater trends and power generation dependency.",
        ),
        entry(
            "https://msf-prep.exe.xyz/",
            "MSF Medical Training",
            "Interactive exam trainer based on Médecins Sans Frontières clinical guidelines. Practice protocols before deployment.",
            "/static/thumbs/msf-prep.jpg",
            3,
            "Create an interactive exam trainer for MSF medical guidelines. Generate questions from the clinical protocols, track progress, show explanations with references back to the official documentation.",
        ),
        entry(
            "https://landcruiser-spares.exe.xyz:8001/",
            "Land Cruiser 100 Blueprint",
            "3D wireframe assembly viewer for Toyota UZJ100/FZJ100. Exploded views from service manuals for parts identification.",
            "/static/thumbs/landcruiser.jpg",
            4,
            "Build a 3D wireframe viewer for the Toyota Land Cruiser 100 series. Extract part diagrams from service manuals, create exploded views by system (engine, transmission, suspension), let users identify and search for parts.",
        ),
        entry(
            "https://schools-at.exe.xyz/",
            "Schulqualität Österreich",
            "5,752 schools across 2,120 municipalities. Service quality ratings, class sizes, and all-day school coverage.",
            "/static/thumbs/schools.jpg",
            5,
            "Map all Austrian schools by municipality with quality indicators. Include student-teacher ratios, all-day school availability, and compare educational supply to school-age population. Help parents find schools near them.",
        ),
        entry(
            "https://maternity-ward-closure.exe.xyz/",
            "Geburtshilfe-Erreichbarkeit",
            "Maternity ward accessibility via OSRM routing. Simulate closures to see drive time impacts on 90k women aged 15-44.",
            "/static/thumbs/maternity.jpg",
            6,
            "Model maternity ward accessibility in Austria using real driving times. Weight by female population 15-44, show which areas exceed 30/45 min drive times. Let users simulate ward closures and see the impact.",
        ),
        entry(
            "https://child-care-access-at.exe.xyz/",
            "Kinderbetreuung Österreich",
            "9,863 childcare facilities mapped. 55% average coverage rate, 848 municipalities without infant care.",
            "/static/thumbs/childcare.jpg",
            7,
            "Visualize childcare availability across Austrian municipalities. Show coverage rates, identify gaps where no infant care exists, compare facility quality indicators. Download data for analysis.",
        ),
        entry(
            "https://austria-power.exe.xyz/",
            "Wind Grid Capacity",
            "1,578 turbines, 441 substations, 30 GW installed. Grid feed-in capacity analysis for wind expansion.",
            "/static/thumbs/power.jpg",
            8,
            "Map Austria's wind turbines and transformer stations. Use Austro Control obstacle data to get turbine heights. Analyze grid capacity for new wind installations by district, show where expansion is feasible.",
        ),
        entry(
            "https://farm-subsidies-austria.exe.xyz/",
            "Agrarsubventionen Österreich",
            "€3.6B in EU farm payments visualized by municipality. Compare actual vs expected allocations across 2,117 communes.",
            "/static/thumbs/farm-subsidies.jpg",
            9,
            "Show EU farm subsidy payments by Austrian municipality. Compare actual payments to what you'd expect based on agricultural area and regional factors. Help farmers understand what programs they might qualify for.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::test_pool;

    #[tokio::test]
    async fn seeds_empty_table_in_fixed_order() {
        let pool = test_pool().await;
        seed_apps(&pool).await;

        let apps = crud::list_apps(&pool).await.unwrap();
        let expected: Vec<String> = seed_entries().into_iter().map(|a| a.title).collect();
        let titles: Vec<String> = apps.iter().map(|a| a.title.clone()).collect();
        assert_eq!(titles, expected);
        let orders: Vec<Option<i64>> = apps.iter().map(|a| a.sort_order).collect();
        assert_eq!(orders, (1..=9).map(Some).collect::<Vec<_>>());
        assert!(apps.iter().all(|a| a.click_count == 0));
    }

    #[tokio::test]
    async fn second_run_changes_nothing() {
        let pool = test_pool().await;
        seed_apps(&pool).await;
        let before = crud::list_apps(&pool).await.unwrap();

        seed_apps(&pool).await;
        let after = crud::list_apps(&pool).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn non_empty_table_is_left_alone() {
        let pool = test_pool().await;
        let only = NewApp {
            url: "https://one.example.com/".into(),
            title: "Only".into(),
            description: "already here".into(),
            ..NewApp::default()
        };
        crud::create_app(&pool, &only).await.unwrap();

        seed_apps(&pool).await;
        assert_eq!(crud::count_apps(&pool).await.unwrap(), 1);
    }
}
