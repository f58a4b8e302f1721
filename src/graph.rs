//! Munin multigraph output built from assembled records.
//!
//! Every record of a table becomes one data point per graphed field, named
//! `{table}_{field}{id}` where the id is the record's position (`A`, `B`, ...).
//! Padding records still produce points, reported as `U` (unknown).

use crate::error::Result;
use crate::extract::{SignalData, Value};

/// Munin's marker for a value that could not be determined.
pub const UNKNOWN: &str = "U";

/// Prefix of every multigraph name.
pub const GRAPH_PREFIX: &str = "surfboard_";

/// One graphed field of a logical table.
#[derive(Debug, Clone, Copy)]
pub struct PointSpec {
    pub table: &'static str,
    pub field: &'static str,
    /// Field attributes in output order; values may use `{id}`, `{table}`, `{point}`
    pub attributes: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Copy)]
pub struct Graph {
    pub name: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub vlabel: &'static str,
    pub points: &'static [PointSpec],
}

pub const GRAPHS: &[Graph] = &[
    Graph {
        name: "snr_power",
        title: "Moto Surfboard Signal/Power",
        category: "network",
        vlabel: "dB (down) / dBmV (up)",
        points: &[
            PointSpec {
                table: "down",
                field: "snr",
                attributes: &[("label", "Downstream {id} SnR"), ("vlabel", "dB")],
            },
            PointSpec {
                table: "up",
                field: "power",
                attributes: &[("label", "Upstream {id} Power"), ("vlabel", "dBmV")],
            },
        ],
    },
    Graph {
        name: "down_power",
        title: "Moto Surfboard Downstream Power Level",
        category: "network",
        vlabel: "dBmV",
        points: &[PointSpec {
            table: "down",
            field: "power",
            attributes: &[("label", "Downstream {id} Power"), ("vlabel", "dBmV")],
        }],
    },
    Graph {
        name: "channels",
        title: "Moto Surfboard Channels",
        category: "network",
        vlabel: "channel",
        points: &[
            PointSpec {
                table: "down",
                field: "channel",
                attributes: &[("label", "Downstream {id} Channel")],
            },
            PointSpec {
                table: "up",
                field: "channel",
                attributes: &[("label", "Upstream {id} Channel")],
            },
        ],
    },
    Graph {
        name: "frequencies",
        title: "Moto Surfboard Frequencies",
        category: "network",
        vlabel: "Hz",
        points: &[
            PointSpec {
                table: "down",
                field: "freq",
                attributes: &[("label", "Downstream {id} Frequency"), ("vlabel", "Hz")],
            },
            PointSpec {
                table: "up",
                field: "freq",
                attributes: &[("label", "Upstream {id} Frequency"), ("vlabel", "Hz")],
            },
        ],
    },
    Graph {
        name: "stats",
        title: "Moto Surfboard Stats",
        category: "network",
        vlabel: "codewords",
        points: &[
            PointSpec {
                table: "stats",
                field: "unerrored",
                attributes: &[
                    ("label", "Unerrored {id}"),
                    ("vlabel", "unerrored"),
                    ("type", "DERIVE"),
                    ("min", "0"),
                ],
            },
            PointSpec {
                table: "stats",
                field: "correctable",
                attributes: &[
                    ("label", "Correctable Errors {id}"),
                    ("vlabel", "correctable"),
                    ("type", "DERIVE"),
                    ("min", "0"),
                ],
            },
            PointSpec {
                table: "stats",
                field: "uncorrectable",
                attributes: &[
                    ("label", "Uncorrectable Errors {id}"),
                    ("vlabel", "uncorrectable"),
                    ("type", "DERIVE"),
                    ("min", "0"),
                ],
            },
        ],
    },
    Graph {
        name: "errors",
        title: "Moto Surfboard Errors",
        category: "network",
        vlabel: "codewords",
        points: &[
            PointSpec {
                table: "stats",
                field: "correctable",
                attributes: &[
                    ("label", "Correctable Errors {id}"),
                    ("vlabel", "correctable"),
                    ("type", "DERIVE"),
                    ("min", "0"),
                ],
            },
            PointSpec {
                table: "stats",
                field: "uncorrectable",
                attributes: &[
                    ("label", "Uncorrectable Errors {id}"),
                    ("vlabel", "uncorrectable"),
                    ("type", "DERIVE"),
                    ("min", "0"),
                ],
            },
        ],
    },
];

/// Identifier for the channel at `index`: `A`..`Z`, then `AA`, `AB`, ...
pub fn channel_id(index: usize) -> String {
    let mut id = String::new();
    let mut n = index;
    loop {
        id.insert(0, char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    id
}

/// A single munin data source: one field of one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPoint {
    pub table: &'static str,
    pub point: &'static str,
    pub id: String,
    pub attributes: &'static [(&'static str, &'static str)],
    pub value: Option<Value>,
}

impl GraphPoint {
    pub fn source(&self) -> String {
        format!("{}_{}{}", self.table, self.point, self.id)
    }

    fn render(&self, template: &str) -> String {
        template
            .replace("{id}", &self.id)
            .replace("{table}", self.table)
            .replace("{point}", self.point)
    }

    /// `{source}.{attribute} {value}` lines
    pub fn config(&self) -> String {
        let source = self.source();
        self.attributes
            .iter()
            .map(|(key, template)| format!("{source}.{key} {}", self.render(template)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn value_line(&self) -> String {
        match &self.value {
            Some(value) => format!("{}.value {value}", self.source()),
            None => format!("{}.value {UNKNOWN}", self.source()),
        }
    }
}

/// Points of `graph`, one per record of each graphed table.
pub fn graph_points(data: &SignalData, graph: &Graph) -> Result<Vec<GraphPoint>> {
    let mut points = Vec::new();
    for spec in graph.points {
        for (index, record) in data.columns(spec.table)?.iter().enumerate() {
            points.push(GraphPoint {
                table: spec.table,
                point: spec.field,
                id: channel_id(index),
                attributes: spec.attributes,
                value: record.get(spec.field).cloned(),
            });
        }
    }
    Ok(points)
}

/// `config` output of one graph.
pub fn config_graph(data: &SignalData, graph: &Graph) -> Result<String> {
    let points = graph_points(data, graph)?;

    let mut lines = vec![
        format!("multigraph {GRAPH_PREFIX}{}", graph.name),
        format!("graph_title {}", graph.title),
        format!("graph_category {}", graph.category),
        format!("graph_vlabel {}", graph.vlabel),
    ];

    let mut order = String::from("graph_order");
    for point in &points {
        order.push(' ');
        order.push_str(&point.source());
    }
    lines.push(order);
    lines.push(String::new());

    lines.extend(
        points
            .iter()
            .map(GraphPoint::config)
            .filter(|config| !config.is_empty()),
    );
    Ok(lines.join("\n"))
}

/// `config` output for all graphs, separated by blank lines.
pub fn config(data: &SignalData, graphs: &[Graph]) -> Result<String> {
    let sections = graphs
        .iter()
        .map(|graph| config_graph(data, graph))
        .collect::<Result<Vec<_>>>()?;
    Ok(sections.join("\n\n"))
}

/// Value output for all graphs, separated by blank lines.
pub fn values(data: &SignalData, graphs: &[Graph]) -> Result<String> {
    let mut lines = Vec::new();
    for graph in graphs {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("multigraph {GRAPH_PREFIX}{}", graph.name));
        lines.extend(graph_points(data, graph)?.iter().map(GraphPoint::value_line));
    }
    Ok(lines.join("\n"))
}
