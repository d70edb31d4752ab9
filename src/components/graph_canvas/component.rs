use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::layout::{LayoutRequest, compute_layout};
use super::render;
use super::state::{CanvasState, GraphChange};
use super::types::GraphDescription;

type SharedState = Rc<RefCell<CanvasState>>;

/// Runs the layout off the event handler and writes the result back when it
/// is still the latest one.
fn schedule_layout(state: SharedState, request: LayoutRequest) {
	spawn_local(async move {
		let generation = request.generation;
		let result = compute_layout(request);
		if state.borrow_mut().complete_layout(result) {
			debug!("layout #{generation} applied");
		}
	});
}

fn local_coords(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

#[component]
pub fn GraphCanvas(
	#[prop(into)] description: Signal<GraphDescription>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(CanvasState::new(
		js_sys::Date::now() as u64,
		width.unwrap_or(800.0),
		height.unwrap_or(600.0),
	)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		state_init.borrow_mut().resize(w, h);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			return;
		};
		info!("graph canvas mounted at {w}x{h}");

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				state_resize.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			render::render(&state_anim.borrow(), &ctx);
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_desc = state.clone();
	Effect::new(move |_| {
		let change = GraphChange::Description(description.get());
		let request = state_desc.borrow_mut().apply(change);
		if let Some(request) = request {
			schedule_layout(state_desc.clone(), request);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local_coords(canvas_ref, &ev) {
			state_md.borrow_mut().press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		let request = state_mm.borrow_mut().pointer_move(x, y);
		if let Some(request) = request {
			schedule_layout(state_mm.clone(), request);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| state_mu.borrow_mut().release();

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| state_ml.borrow_mut().release();

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = local_coords(canvas_ref, &ev) {
			state_wh.borrow_mut().wheel(x, y, ev.delta_y());
		}
	};

	let state_reset = state.clone();
	let on_reset = move |_: MouseEvent| state_reset.borrow_mut().reset_view();

	let state_zin = state.clone();
	let on_zoom_in = move |_: MouseEvent| state_zin.borrow_mut().zoom_step(-1.0);

	let state_zout = state.clone();
	let on_zoom_out = move |_: MouseEvent| state_zout.borrow_mut().zoom_step(1.0);

	view! {
		<div class="graph-canvas">
			<canvas
				node_ref=canvas_ref
				class="graph-canvas-surface"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-canvas-controls">
				<button class="graph-canvas-zoom-in" on:click=on_zoom_in>
					"+"
				</button>
				<button class="graph-canvas-zoom-out" on:click=on_zoom_out>
					"-"
				</button>
				<button class="graph-canvas-reset" on:click=on_reset>
					"Reset view"
				</button>
			</div>
		</div>
	}
}
