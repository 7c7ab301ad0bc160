//! Plain text rendering of a scenario report

use super::{path_label, RenderOptions};
use crate::simulation::ScenarioReport;
use crate::topology::DomainNode;
use std::fmt::Write;

/// Render one report as a summary followed by an indented domain tree
pub fn render_text(report: &ScenarioReport, options: &RenderOptions) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Replication factor {} across {} nodes (quorum {}, up to {} replicas may be lost)",
        report.replication_factor,
        report.node_count,
        report.quorum_size(),
        report.allowable_dead
    );

    if report.under_replicated {
        let _ = writeln!(
            out,
            "The system is underreplicated: There are {} nodes, but {} are needed.",
            report.node_count, report.replication_factor
        );
    } else if report.failure_granularity == 0 {
        let _ = writeln!(out, "Failure simulation disabled");
    } else {
        let _ = writeln!(
            out,
            "Failure granularity: {}",
            report.level_name(report.failure_granularity)
        );
        let _ = writeln!(
            out,
            "Worst case: {} of {} replicas lost in {} domains, {} survive, quorum {}",
            report.outcome.killed,
            report.replication_factor,
            report.failed_domain_count(),
            report.surviving_replicas(),
            if report.quorum_holds() { "holds" } else { "lost" }
        );
        for (i, count) in report.outcome.per_level.iter().enumerate() {
            let _ = writeln!(out, "  {}: {} failed", report.level_name(i + 1), count);
        }
    }

    out.push('\n');
    for child in &report.tree.children {
        render_node(&mut out, report, child, 0, options);
    }

    if options.show_trace && !report.trace.is_empty() {
        out.push_str("\nTraversal:\n");
        for step in &report.trace {
            let _ = writeln!(
                out,
                "  {} {} [replicas {}] {} (budget left {})",
                report.level_name(step.depth),
                path_label(&step.path),
                step.replica_count,
                step.action,
                step.remaining
            );
        }
    }

    out
}

fn render_node(
    out: &mut String,
    report: &ScenarioReport,
    node: &DomainNode,
    indent: usize,
    options: &RenderOptions,
) {
    if node.replica_count == 0 && !node.failed && !options.show_empty {
        return;
    }

    let _ = writeln!(
        out,
        "{:indent$}{} {} [replicas {}]{}",
        "",
        report.level_name(node.depth),
        node.index,
        node.replica_count,
        if node.failed { " FAILED" } else { "" },
        indent = indent * 2
    );

    for child in &node.children {
        render_node(out, report, child, indent + 1, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, LevelSpec, Simulator};

    #[test]
    fn test_summary_and_tree() {
        let report = Simulator::new(Config::default()).run().unwrap();
        let text = render_text(&report, &RenderOptions::default());

        assert!(text.contains("Replication factor 3 across 81 nodes"));
        assert!(text.contains("Failure granularity: Region"));
        assert!(text.contains("Worst case: 1 of 3 replicas lost in 1 domains, 2 survive, quorum holds"));
        assert!(text.contains("Region 1 [replicas 1] FAILED"));
        assert!(text.contains("  Data Center 1 [replicas 1]"));
        assert!(!text.contains("Data Center 2"));
    }

    #[test]
    fn test_show_empty_domains() {
        let report = Simulator::new(Config::default()).run().unwrap();
        let options = RenderOptions {
            show_empty: true,
            ..RenderOptions::default()
        };
        let text = render_text(&report, &options);

        assert!(text.contains("Data Center 2 [replicas 0]"));
        assert_eq!(text.matches("Node ").count(), 81);
    }

    #[test]
    fn test_trace_section() {
        let report = Simulator::new(Config::default()).run().unwrap();
        let options = RenderOptions {
            show_trace: true,
            ..RenderOptions::default()
        };
        let text = render_text(&report, &options);

        assert!(text.contains("Traversal:"));
        assert!(text.contains("Region 1 [replicas 1] killed (budget left 0)"));
    }

    #[test]
    fn test_under_replicated_notice() {
        let config = Config::new(vec![LevelSpec::new("Node", 1)], 3, 1);
        let report = Simulator::new(config).run().unwrap();
        let text = render_text(&report, &RenderOptions::default());

        assert!(text.contains("The system is underreplicated: There are 1 nodes, but 3 are needed."));
        assert!(!text.contains("Worst case"));
    }
}
