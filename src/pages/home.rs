use leptos::prelude::*;

use crate::components::graph_canvas::{EdgeAttrs, EdgeSpec, GraphCanvas, GraphDescription, NodeId, NodeSpec};

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

#[derive(Clone, Copy, Debug, PartialEq)]
struct Modes {
	drag: bool,
	directed: bool,
	draw_graph: bool,
	like_tree: bool,
}

/// Sample multigraph: a random forest plus parallel edges and self-loops.
fn generate_sample_data(n: usize, modes: Modes) -> GraphDescription {
	let nodes = (0..n)
		.map(|i| {
			(
				NodeId::Num(i as i64),
				NodeSpec {
					color: COLORS[i % COLORS.len()].to_string(),
					label: (i < 10).then(|| format!("Node {}", i)),
				},
			)
		})
		.collect();

	let plain = |i: usize| EdgeAttrs {
		weight: Some(i as f64),
		color: String::new(),
		dashed: false,
	};
	let mut edges: Vec<EdgeSpec> = (1..n)
		.filter(|i| i % 7 != 0)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as i64;
			EdgeSpec::new(i as i64, target, plain(i))
		})
		.collect();

	// Parallel bundles in both declared directions, and self-loops.
	for i in (2..n).step_by(5) {
		let target = (rand_simple(i) * (i as f64)) as i64;
		edges.push(EdgeSpec::new(target, i as i64, EdgeAttrs {
			dashed: true,
			color: "#e377c2".into(),
			..plain(i)
		}));
		edges.push(EdgeSpec::new(i as i64, target, plain(i + 1)));
	}
	for i in (0..n).step_by(9) {
		edges.push(EdgeSpec::new(i as i64, i as i64, plain(i)));
		if i % 2 == 0 {
			edges.push(EdgeSpec::new(i as i64, i as i64, plain(i + 1)));
		}
	}

	GraphDescription {
		nodes,
		edges,
		drag: modes.drag,
		directed: modes.directed,
		draw_graph: modes.draw_graph,
		like_tree: modes.like_tree,
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

#[component]
fn Toggle(label: &'static str, value: RwSignal<bool>) -> impl IntoView {
	view! {
		<label class="graph-toggle">
			<input
				type="checkbox"
				prop:checked=move || value.get()
				on:change=move |_| value.update(|v| *v = !*v)
			/>
			{label}
		</label>
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let drag = RwSignal::new(true);
	let directed = RwSignal::new(true);
	let draw_graph = RwSignal::new(true);
	let like_tree = RwSignal::new(false);
	let size = RwSignal::new(30usize);

	let graph_data = Signal::derive(move || {
		generate_sample_data(size.get(), Modes {
			drag: drag.get(),
			directed: directed.get(),
			draw_graph: draw_graph.get(),
			like_tree: like_tree.get(),
		})
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphCanvas description=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>"Multigraph Canvas"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Scroll to zoom. Drag background to pan."
					</p>
					<Toggle label="Group drag" value=drag />
					<Toggle label="Directed" value=directed />
					<Toggle label="Auto layout" value=draw_graph />
					<Toggle label="Tree layout" value=like_tree />
					<button on:click=move |_| size.update(|n| *n += 1)>"Add node"</button>
					<button on:click=move |_| size.update(|n| *n = n.saturating_sub(1))>
						"Remove node"
					</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
