//! Terminal rendition of the dashboard page.
//!
//! # Invariants
//! - `0` averages render as placeholders, never as a position.

use rankdash_core::{ProjectListItem, UserStats};
use std::fmt::{self, Display, Formatter};

/// Dashboard page: metric cards followed by the project list.
pub struct Dashboard<'a> {
    pub stats: &'a UserStats,
    pub projects: &'a [ProjectListItem],
}

impl Display for Dashboard<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        writeln!(f, "Dashboard")?;
        writeln!(f)?;

        metric_card(
            f,
            "Projects",
            &stats.project_count.to_string(),
            if stats.project_count > 0 {
                "Active projects"
            } else {
                "+ Create your first project"
            },
        )?;
        metric_card(
            f,
            "Keywords",
            &stats.keyword_count.to_string(),
            if stats.keyword_count > 0 {
                "Tracking keywords"
            } else {
                "+ Add keywords to track"
            },
        )?;
        metric_card(
            f,
            "Avg. Position",
            &format_stats_average(stats.avg_position),
            if stats.avg_position > 0.0 {
                "Current average"
            } else {
                "Start tracking rankings"
            },
        )?;
        metric_card(
            f,
            "Rankings",
            &stats.total_rankings.to_string(),
            if stats.total_rankings > 0 {
                "Total data points"
            } else {
                "Rankings will appear here"
            },
        )?;

        writeln!(f)?;
        writeln!(f, "Your Projects")?;
        if self.projects.is_empty() {
            writeln!(f, "  No projects yet")?;
            return writeln!(
                f,
                "  Create your first SEO project to start tracking keywords and rankings."
            );
        }

        for item in self.projects {
            writeln!(
                f,
                "  {}  {}  {} keywords  {}",
                item.project.name,
                item.project.domain,
                item.counts.keywords,
                project_position_label(item.avg_position),
            )?;
        }
        Ok(())
    }
}

/// Renders the dashboard page as text.
pub fn render_dashboard(stats: &UserStats, projects: &[ProjectListItem]) -> String {
    Dashboard { stats, projects }.to_string()
}

/// Stats card value: one decimal, or `--` without data.
pub fn format_stats_average(avg: f64) -> String {
    if avg > 0.0 {
        format!("{avg:.1}")
    } else {
        "--".to_string()
    }
}

/// Project row badge: `Avg. #<avg>` or a no-data hint.
pub fn project_position_label(avg: f64) -> String {
    if avg > 0.0 {
        format!("Avg. #{avg}")
    } else {
        "No rankings yet".to_string()
    }
}

fn metric_card(f: &mut Formatter<'_>, label: &str, value: &str, caption: &str) -> fmt::Result {
    writeln!(f, "{label:<14} {value:>6}   {caption}")
}

#[cfg(test)]
mod tests {
    use super::{format_stats_average, project_position_label, render_dashboard};
    use rankdash_core::{Project, ProjectCounts, ProjectListItem, UserStats};
    use serde_json::Map;
    use uuid::Uuid;

    fn item(name: &str, keywords: u64, avg_position: f64) -> ProjectListItem {
        ProjectListItem {
            project: Project {
                id: Uuid::new_v4(),
                name: name.to_string(),
                domain: format!("https://{}.test", name.to_lowercase()),
                user_id: Uuid::new_v4(),
                settings: Map::new(),
                created_at: 0,
                updated_at: 0,
            },
            keywords: Vec::new(),
            counts: ProjectCounts {
                keywords,
                audits: 0,
                backlinks: 0,
            },
            avg_position,
        }
    }

    #[test]
    fn zero_average_renders_placeholders() {
        assert_eq!(format_stats_average(0.0), "--");
        assert_eq!(project_position_label(0.0), "No rankings yet");
    }

    #[test]
    fn averages_render_like_the_web_page() {
        assert_eq!(format_stats_average(5.0), "5.0");
        assert_eq!(format_stats_average(4.26), "4.3");
        assert_eq!(project_position_label(5.0), "Avg. #5");
        assert_eq!(project_position_label(5.5), "Avg. #5.5");
    }

    #[test]
    fn empty_dashboard_invites_first_project() {
        let rendered = render_dashboard(&UserStats::default(), &[]);
        assert!(rendered.contains("No projects yet"));
        assert!(rendered.contains("+ Create your first project"));
        assert!(rendered.contains("Start tracking rankings"));
    }

    #[test]
    fn project_rows_show_counts_and_badges() {
        let stats = UserStats {
            project_count: 2,
            keyword_count: 3,
            total_rankings: 4,
            avg_position: 6.5,
        };
        let rendered = render_dashboard(&stats, &[item("Shop", 3, 5.5), item("Blog", 0, 0.0)]);
        assert!(rendered.contains("Shop  https://shop.test  3 keywords  Avg. #5.5"));
        assert!(rendered.contains("Blog  https://blog.test  0 keywords  No rankings yet"));
        assert!(rendered.contains("6.5"));
        assert!(!rendered.contains("No projects yet"));
    }
}
