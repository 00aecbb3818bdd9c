use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::graph::{RoutePath, highlight};

use super::state::{ForceGraphState, NODE_RADIUS};

const ARROW_SIZE: f64 = 6.0;

pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	selected: Option<&RoutePath>,
	start: Option<char>,
) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx, selected);
	draw_nodes(state, ctx, start);
	ctx.restore();
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	selected: Option<&RoutePath>,
) {
	state.graph.visit_edges(|n1, n2, edge| {
		let info = &edge.user_data;
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		let color = highlight::edge_color(selected, info.source, info.target);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(highlight::edge_width(selected, info.source, info.target));

		let (ux, uy) = (dx / dist, dy / dist);
		let (mid_x, mid_y) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
		let label = info.weight.to_string();

		if info.curvature == 0.0 {
			ctx.begin_path();
			ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
			ctx.line_to(
				x2 - ux * (NODE_RADIUS + ARROW_SIZE),
				y2 - uy * (NODE_RADIUS + ARROW_SIZE),
			);
			ctx.stroke();
			draw_arrow(ctx, x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS, ux, uy, color);
			draw_weight_label(ctx, &label, mid_x, mid_y);
		} else {
			// Control point offset perpendicular to the chord; the curve's
			// midpoint then sits at half that offset, where the label goes.
			let (nx, ny) = (-dy / dist, dx / dist);
			let offset = -info.curvature * dist;
			let (cx, cy) = (mid_x + nx * offset, mid_y + ny * offset);

			let (sdx, sdy) = (cx - x1, cy - y1);
			let slen = (sdx * sdx + sdy * sdy).sqrt().max(0.001);
			let (sux, suy) = (sdx / slen, sdy / slen);
			let (edx, edy) = (x2 - cx, y2 - cy);
			let elen = (edx * edx + edy * edy).sqrt().max(0.001);
			let (eux, euy) = (edx / elen, edy / elen);

			ctx.begin_path();
			ctx.move_to(x1 + sux * NODE_RADIUS, y1 + suy * NODE_RADIUS);
			ctx.quadratic_curve_to(
				cx,
				cy,
				x2 - eux * (NODE_RADIUS + ARROW_SIZE),
				y2 - euy * (NODE_RADIUS + ARROW_SIZE),
			);
			ctx.stroke();
			draw_arrow(
				ctx,
				x2 - eux * NODE_RADIUS,
				y2 - euy * NODE_RADIUS,
				eux,
				euy,
				color,
			);
			draw_weight_label(ctx, &label, mid_x + nx * offset * 0.5, mid_y + ny * offset * 0.5);
		}
	});
}

fn draw_arrow(
	ctx: &CanvasRenderingContext2d,
	tip_x: f64,
	tip_y: f64,
	ux: f64,
	uy: f64,
	color: &str,
) {
	let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.set_fill_style_str(color);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_weight_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64) {
	ctx.set_font("4px sans-serif");
	ctx.set_fill_style_str("white");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, x, y);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, start: Option<char>) {
	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);

		ctx.begin_path();
		let _ = ctx.arc(x, y, NODE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(highlight::node_color(info.id, start, &info.color));
		ctx.fill();
		ctx.set_stroke_style_str("black");
		ctx.set_line_width(0.5);
		ctx.stroke();

		ctx.set_font("6px sans-serif");
		ctx.set_fill_style_str("white");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&info.id.to_string(), x, y);
	});
}
