use anyhow::Result;
use chrono::{TimeZone, Utc};
use std::path::Path;

use crate::model::{Judge, Project};
use crate::store::{save_contest_data, ContestData};

fn judge(id: &str, name: &str, expertise: &str) -> Judge {
    Judge {
        id: id.to_string(),
        name: name.to_string(),
        expertise: expertise.to_string(),
        avatar: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    id: &str,
    title: &str,
    description: &str,
    problem: &str,
    solution: &str,
    team: &[&str],
    category: &str,
    tags: &[&str],
    day: u32,
) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        problem: problem.to_string(),
        proposed_solution: solution.to_string(),
        team: team.iter().map(|s| s.to_string()).collect(),
        category: category.to_string(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
        submission_date: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).single(),
    }
}

/// Sample contest with projects and judges but no scores yet
pub fn starter_data() -> ContestData {
    let judges = vec![
        judge("j1", "Dr. Sarah Chen", "AI & Machine Learning"),
        judge("j2", "Mark Rodriguez", "Sustainability Tech"),
        judge("j3", "Prof. Lisa Wang", "Healthcare Innovation"),
        judge("j4", "David Kumar", "Fintech & Blockchain"),
        judge("j5", "Dr. Emily Foster", "IoT & Smart Cities"),
    ];

    let projects = vec![
        project(
            "p1",
            "EcoTrack AI",
            "AI-powered carbon footprint tracking for enterprises",
            "Companies struggle to measure and reduce their carbon footprint",
            "Models that analyze energy consumption patterns and suggest sustainability improvements",
            &["Alice Johnson", "Bob Smith", "Carol Lee"],
            "Sustainability",
            &["AI", "Environment", "Analytics"],
            15,
        ),
        project(
            "p2",
            "HealthGuard",
            "Real-time health monitoring through wearable devices",
            "Early detection of health issues is hard for remote patients",
            "Wearables that predict health risks and alert medical staff in real time",
            &["Jennifer Wilson", "Tom Anderson", "Maria Garcia"],
            "Healthcare",
            &["IoT", "Healthcare", "Wearables"],
            16,
        ),
        project(
            "p3",
            "SmartFarm Pro",
            "Precision agriculture using drones and soil sensors",
            "Traditional farming is inefficient and environmentally harmful",
            "Autonomous drones with multispectral cameras for precise crop management",
            &["Robert Taylor", "Susan Martinez", "James Thompson"],
            "Agriculture",
            &["Drones", "IoT", "Agriculture"],
            17,
        ),
        project(
            "p4",
            "CyberShield",
            "Threat detection with quantum-resistant encryption",
            "Current security measures are exposed to quantum attacks",
            "Post-quantum encryption combined with automated threat detection",
            &["Alex Chen", "Rachel Kim", "Michael Brown"],
            "Cybersecurity",
            &["Security", "Encryption", "AI"],
            18,
        ),
        project(
            "p5",
            "AquaPure Systems",
            "Water purification using nanotechnology",
            "Access to clean drinking water remains a global challenge",
            "Nanotech filtration that removes contaminants at the molecular level",
            &["Maria Santos", "Thomas Liu", "Jennifer Adams"],
            "Water Tech",
            &["Nanotechnology", "Water", "Purification"],
            19,
        ),
    ];

    ContestData::with_records(projects, judges)
}

/// Write the starter contest to `path`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_starter_data(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Contest data already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    save_contest_data(path, &starter_data())
}
