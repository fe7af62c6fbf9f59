use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::DVec3;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WebGl2RenderingContext,
};
use yew::prelude::*;

use super::project_overlay::ProjectOverlay;
use super::scroll_indicator::ScrollIndicator;
use super::SharedContent;
use crate::constants::{durations, ALL_ZONES, CAMERA_PATH, ZONE_COUNT, Zone};
use crate::content::ProjectData;
use crate::managers::{
    GlobalCallbacks, InteractionCallbacks, InteractionManager, NavigationMode,
    NavigationStateManager, PortalConfig, PortalManager, PortalState, ScrollManager,
};
use crate::scene::graph::SceneGraph;
use crate::scene::manager::{PerformanceMode, SceneManager};
use crate::scene::{CameraController, CameraRig};
use crate::util::now_ms;

#[derive(Properties, PartialEq, Clone)]
pub struct WorldViewProps {
    pub content: SharedContent,
    pub on_use_fallback: Callback<()>,
}

/// Portal ring around the central nexus, one slot per project.
fn portal_position(index: usize, count: usize) -> DVec3 {
    let angle = std::f64::consts::TAU * index as f64 / count.max(1) as f64;
    let radius = 6.0;
    DVec3::new(angle.cos() * radius, 0.0, angle.sin() * radius - 2.0)
}

fn portal_configs(projects: &[ProjectData]) -> Vec<PortalConfig> {
    projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let position = portal_position(i, projects.len());
            PortalConfig {
                id: format!("portal-{}", project.id),
                position,
                project_id: project.id.clone(),
                entry_point: position + DVec3::new(0.0, 2.0, 5.0),
                exit_point: position,
                transition_duration: durations::PORTAL_ENTRY,
            }
        })
        .collect()
}

#[function_component(WorldView)]
pub fn world_view(props: &WorldViewProps) -> Html {
    let gl_canvas_ref = use_node_ref();
    let overlay_ref = use_node_ref();

    let rig = use_mut_ref(CameraRig::default);
    let camera = {
        let rig = rig.clone();
        use_mut_ref(move || CameraController::new(rig))
    };
    let scene = {
        let rig = rig.clone();
        use_mut_ref(move || SceneManager::new(rig, PerformanceMode::High))
    };
    let scroll = use_mut_ref(ScrollManager::new);
    let nav = use_mut_ref(NavigationStateManager::new);
    let portals = use_mut_ref(PortalManager::new);
    let interaction = use_mut_ref(InteractionManager::new);
    let graph = use_mut_ref(SceneGraph::new);

    let progress = use_state(|| 0.0_f64);
    let zone_label = use_state(|| Zone::EntryPortal.label().to_string());
    let active_project = use_state(|| None::<ProjectData>);
    let context_lost = use_state(|| false);

    // Mount: scene graph, listeners, frame loop.
    {
        let gl_canvas_ref = gl_canvas_ref.clone();
        let overlay_ref = overlay_ref.clone();
        let rig = rig.clone();
        let camera = camera.clone();
        let scene = scene.clone();
        let scroll = scroll.clone();
        let nav = nav.clone();
        let portals = portals.clone();
        let interaction = interaction.clone();
        let graph = graph.clone();
        let content = props.content.clone();
        let progress_handle = progress.clone();
        let zone_label_handle = zone_label.clone();
        let active_project_handle = active_project.clone();
        let context_lost_handle = context_lost.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let gl_canvas: HtmlCanvasElement =
                gl_canvas_ref.cast::<HtmlCanvasElement>().expect("gl canvas");
            let overlay: HtmlCanvasElement =
                overlay_ref.cast::<HtmlCanvasElement>().expect("overlay canvas");

            let apply_canvas_size = {
                let gl_canvas = gl_canvas.clone();
                let overlay = overlay.clone();
                let window = window.clone();
                move || {
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0)
                        .max(1.0) as u32;
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0)
                        .max(1.0) as u32;
                    gl_canvas.set_width(width);
                    gl_canvas.set_height(height);
                    overlay.set_width(width);
                    overlay.set_height(height);
                }
            };
            apply_canvas_size();

            // Portal registry + hit geometry + click wiring.
            {
                let projects = content.0.borrow().content().projects.clone();
                let configs = portal_configs(&projects);
                let mut graph_mut = graph.borrow_mut();
                let mut portals_mut = portals.borrow_mut();
                let mut interaction_mut = interaction.borrow_mut();
                for config in configs {
                    let handle =
                        graph_mut.insert(None, config.position, 0.0, config.id.clone());
                    graph_mut.insert(Some(handle), config.position, 1.5, "portal-mesh");

                    let portal_id = config.id.clone();
                    let project_id = config.project_id.clone();
                    let portals_cb = portals.clone();
                    let camera_cb = camera.clone();
                    let nav_cb = nav.clone();
                    let rig_cb = rig.clone();
                    interaction_mut.register(
                        handle,
                        InteractionCallbacks {
                            on_click: Some(Box::new(move |_| {
                                if camera_cb.borrow().is_in_transition()
                                    || portals_cb.borrow().state() != PortalState::Closed
                                {
                                    return;
                                }
                                let (from_pos, from_target) = {
                                    let rig = rig_cb.borrow();
                                    (rig.position, rig.target)
                                };
                                nav_cb.borrow_mut().enter_transition_mode();
                                let nav_done = nav_cb.clone();
                                let project_done = project_id.clone();
                                let rig_update = rig_cb.clone();
                                let started = portals_cb.borrow_mut().enter_portal(
                                    &portal_id,
                                    from_pos,
                                    from_target,
                                    move |pos, target| {
                                        rig_update.borrow_mut().set_pose(pos, target)
                                    },
                                    Some(Box::new(move || {
                                        let mut nav = nav_done.borrow_mut();
                                        nav.enter_project_mode(&project_done);
                                        nav.exit_transition_mode();
                                    })),
                                );
                                if !started {
                                    nav_cb.borrow_mut().exit_transition_mode();
                                }
                            })),
                            ..InteractionCallbacks::default()
                        },
                    );
                    portals_mut.register_portal(config);
                }

                let overlay_cursor = overlay.clone();
                interaction_mut.set_global_callbacks(GlobalCallbacks {
                    on_hover: Some(Box::new(move |picked| {
                        let cursor = if picked.is_some() { "pointer" } else { "default" };
                        let _ = overlay_cursor.style().set_property("cursor", cursor);
                    })),
                    on_click: None,
                });
            }

            // Navigation changes drive the HUD.
            let nav_sub = {
                let content = content.clone();
                let zone_label_handle = zone_label_handle.clone();
                let active_project_handle = active_project_handle.clone();
                nav.borrow_mut().subscribe(move |state| {
                    if let Some(zone) = state.current_zone {
                        zone_label_handle.set(zone.label().to_string());
                    }
                    let project = state
                        .active_project
                        .as_ref()
                        .and_then(|id| content.0.borrow().project(id).cloned());
                    active_project_handle.set(project);
                })
            };

            // Render context. A lost context keeps the loop alive; the GL
            // calls simply stop mattering until restore re-acquires it.
            let gl_ctx: Rc<RefCell<Option<WebGl2RenderingContext>>> =
                Rc::new(RefCell::new(None));
            let acquire_gl = {
                let gl_canvas = gl_canvas.clone();
                let gl_ctx = gl_ctx.clone();
                move || {
                    *gl_ctx.borrow_mut() = gl_canvas
                        .get_context("webgl2")
                        .ok()
                        .flatten()
                        .and_then(|ctx| ctx.dyn_into::<WebGl2RenderingContext>().ok());
                    gl_ctx.borrow().is_some()
                }
            };
            if acquire_gl() {
                scene.borrow_mut().on_scene_ready();
            } else {
                scene.borrow_mut().fail("could not create a webgl2 context");
            }

            scroll.borrow_mut().start();

            // Draw: GL clears the backdrop, the 2d overlay draws projected
            // zone and portal markers.
            let draw: Rc<dyn Fn()> = {
                let overlay = overlay.clone();
                let gl_ctx = gl_ctx.clone();
                let rig = rig.clone();
                let portals = portals.clone();
                let graph = graph.clone();
                let camera = camera.clone();
                Rc::new(move || {
                    if let Some(gl) = &*gl_ctx.borrow() {
                        gl.clear_color(0.03, 0.05, 0.09, 1.0);
                        gl.clear(WebGl2RenderingContext::COLOR_BUFFER_BIT);
                    }
                    let Some(ctx) = overlay
                        .get_context("2d")
                        .ok()
                        .flatten()
                        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                    else {
                        return;
                    };
                    let w = overlay.width() as f64;
                    let h = overlay.height() as f64;
                    ctx.clear_rect(0.0, 0.0, w, h);
                    let rig = rig.borrow();

                    let current = camera.borrow().current_zone_index();
                    for (i, zone) in ALL_ZONES.iter().enumerate() {
                        let Some((x, y)) = rig.project_to_screen(zone.anchor(), w, h) else {
                            continue;
                        };
                        ctx.begin_path();
                        ctx.set_fill_style_str(if i == current {
                            "#58a6ff"
                        } else {
                            "#2f3641"
                        });
                        let _ = ctx.arc(x, y, 8.0, 0.0, std::f64::consts::TAU);
                        ctx.fill();
                        ctx.set_fill_style_str("#c9d1d9");
                        ctx.set_font("13px sans-serif");
                        ctx.set_text_align("center");
                        let _ = ctx.fill_text(zone.label(), x, y - 14.0);
                    }

                    let hovered: Vec<String> = graph
                        .borrow()
                        .iter()
                        .filter(|(_, node)| node.hovered)
                        .map(|(_, node)| node.tag.clone())
                        .collect();
                    for portal in portals.borrow().all_portals() {
                        let Some((x, y)) = rig.project_to_screen(portal.position, w, h) else {
                            continue;
                        };
                        let hot = hovered.iter().any(|tag| *tag == portal.id);
                        ctx.begin_path();
                        ctx.set_fill_style_str(if hot { "#d9a441" } else { "#1f6f54" });
                        let _ = ctx.arc(x, y, if hot { 12.0 } else { 9.0 }, 0.0, std::f64::consts::TAU);
                        ctx.fill();
                    }
                })
            };

            // Frame loop.
            let last_ts = Rc::new(Cell::new(now_ms()));
            let last_pct = Rc::new(Cell::new(-1_i64));
            let raf_id = Rc::new(RefCell::new(None));
            {
                let raf_id_clone = raf_id.clone();
                let window_loop = window.clone();
                let scroll = scroll.clone();
                let camera = camera.clone();
                let portals = portals.clone();
                let nav = nav.clone();
                let draw = draw.clone();
                let progress_handle = progress_handle.clone();
                let closure_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> =
                    Rc::new(RefCell::new(None));
                let closure_cell_clone = closure_cell.clone();
                *closure_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    let now = now_ms();
                    let dt = ((now - last_ts.get()) / 1000.0).clamp(0.0, 0.1);
                    last_ts.set(now);

                    let frame = scroll.borrow_mut().step();
                    if let Some(frame) = frame {
                        let busy = camera.borrow().is_in_transition()
                            || portals.borrow().is_transitioning();
                        let exploring =
                            nav.borrow().current_mode() == NavigationMode::Exploration;
                        if !busy && exploring {
                            camera.borrow_mut().update_from_scroll(frame.progress);
                            let idx = (frame.progress * (ZONE_COUNT - 1) as f64).round()
                                as usize;
                            if let Some(zone) = Zone::from_index(idx) {
                                nav.borrow_mut().navigate_to_zone(zone);
                            }
                        }
                        let pct = (frame.progress * 1000.0).round() as i64;
                        if pct != last_pct.get() {
                            last_pct.set(pct);
                            progress_handle.set(frame.progress);
                        }
                    }
                    camera.borrow_mut().tick(dt);
                    portals.borrow_mut().tick(dt);
                    draw();

                    if let Ok(id) = window_loop.request_animation_frame(
                        closure_cell_clone
                            .borrow()
                            .as_ref()
                            .unwrap()
                            .as_ref()
                            .unchecked_ref(),
                    ) {
                        *raf_id_clone.borrow_mut() = Some(id);
                    }
                }) as Box<dyn FnMut()>));
                if let Ok(id) = window.request_animation_frame(
                    closure_cell
                        .borrow()
                        .as_ref()
                        .unwrap()
                        .as_ref()
                        .unchecked_ref(),
                ) {
                    *raf_id.borrow_mut() = Some(id);
                }
            }

            let make_ray = {
                let overlay = overlay.clone();
                let rig = rig.clone();
                move |client_x: f64, client_y: f64| {
                    let rect = overlay.get_bounding_client_rect();
                    let w = rect.width().max(1.0);
                    let h = rect.height().max(1.0);
                    let ndc_x = (client_x - rect.left()) / w * 2.0 - 1.0;
                    let ndc_y = 1.0 - (client_y - rect.top()) / h * 2.0;
                    rig.borrow().ray_from_ndc(ndc_x, ndc_y, w / h)
                }
            };

            // Wheel scroll.
            let wheel_cb = {
                let scroll = scroll.clone();
                Closure::wrap(Box::new(move |e: web_sys::WheelEvent| {
                    e.prevent_default();
                    scroll.borrow_mut().handle_wheel(e.delta_y());
                }) as Box<dyn FnMut(_)>)
            };
            let _ = overlay
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref());

            // Keyboard scroll.
            let keydown_cb = {
                let scroll = scroll.clone();
                Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
                    if scroll.borrow_mut().handle_key(&e.key()) {
                        e.prevent_default();
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let _ = window
                .add_event_listener_with_callback("keydown", keydown_cb.as_ref().unchecked_ref());

            // Pointer hover + click.
            let mousemove_cb = {
                let interaction = interaction.clone();
                let graph = graph.clone();
                let make_ray = make_ray.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let ray = make_ray(e.client_x() as f64, e.client_y() as f64);
                    interaction
                        .borrow_mut()
                        .pointer_move(&ray, &mut graph.borrow_mut());
                }) as Box<dyn FnMut(_)>)
            };
            let _ = overlay.add_event_listener_with_callback(
                "mousemove",
                mousemove_cb.as_ref().unchecked_ref(),
            );
            let click_cb = {
                let interaction = interaction.clone();
                let graph = graph.clone();
                let make_ray = make_ray.clone();
                Closure::wrap(Box::new(move |e: MouseEvent| {
                    let ray = make_ray(e.client_x() as f64, e.client_y() as f64);
                    interaction
                        .borrow_mut()
                        .pointer_click(&ray, &mut graph.borrow_mut());
                }) as Box<dyn FnMut(_)>)
            };
            let _ = overlay
                .add_event_listener_with_callback("click", click_cb.as_ref().unchecked_ref());

            // Touch: drag scrolls, a short tap clicks.
            let touchstart_cb = {
                let scroll = scroll.clone();
                let interaction = interaction.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if let Some(touch) = e.touches().item(0) {
                        scroll.borrow_mut().handle_touch_start(touch.client_y() as f64);
                        interaction
                            .borrow_mut()
                            .touch_start(touch.client_x() as f64, touch.client_y() as f64);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let _ = overlay.add_event_listener_with_callback(
                "touchstart",
                touchstart_cb.as_ref().unchecked_ref(),
            );
            let touchmove_cb = {
                let scroll = scroll.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if let Some(touch) = e.touches().item(0) {
                        scroll.borrow_mut().handle_touch_move(touch.client_y() as f64);
                    }
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            let _ = overlay.add_event_listener_with_callback(
                "touchmove",
                touchmove_cb.as_ref().unchecked_ref(),
            );
            let touchend_cb = {
                let interaction = interaction.clone();
                let graph = graph.clone();
                let make_ray = make_ray.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if let Some(touch) = e.changed_touches().item(0) {
                        let (x, y) = (touch.client_x() as f64, touch.client_y() as f64);
                        let ray = make_ray(x, y);
                        interaction
                            .borrow_mut()
                            .touch_end(x, y, &ray, &mut graph.borrow_mut());
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let _ = overlay.add_event_listener_with_callback(
                "touchend",
                touchend_cb.as_ref().unchecked_ref(),
            );

            // Resize.
            let resize_cb = {
                let apply_canvas_size = apply_canvas_size.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    apply_canvas_size();
                }) as Box<dyn FnMut(_)>)
            };
            let _ = window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());

            // Context loss and recovery.
            let contextlost_cb = {
                let scene = scene.clone();
                let interaction = interaction.clone();
                let graph = graph.clone();
                let context_lost_handle = context_lost_handle.clone();
                Closure::wrap(Box::new(move |e: web_sys::Event| {
                    // Required so the browser will attempt a restore.
                    e.prevent_default();
                    scene.borrow_mut().handle_context_loss();
                    interaction
                        .borrow_mut()
                        .set_enabled(false, &mut graph.borrow_mut());
                    context_lost_handle.set(true);
                }) as Box<dyn FnMut(_)>)
            };
            let _ = gl_canvas.add_event_listener_with_callback(
                "webglcontextlost",
                contextlost_cb.as_ref().unchecked_ref(),
            );
            let contextrestored_cb = {
                let scene = scene.clone();
                let interaction = interaction.clone();
                let graph = graph.clone();
                let context_lost_handle = context_lost_handle.clone();
                let acquire_gl = acquire_gl.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    let acquire = acquire_gl.clone();
                    scene.borrow_mut().handle_context_restore(move || {
                        acquire();
                    });
                    interaction
                        .borrow_mut()
                        .set_enabled(true, &mut graph.borrow_mut());
                    context_lost_handle.set(false);
                }) as Box<dyn FnMut(_)>)
            };
            let _ = gl_canvas.add_event_listener_with_callback(
                "webglcontextrestored",
                contextrestored_cb.as_ref().unchecked_ref(),
            );

            // Cleanup.
            let window_clone = window.clone();
            let scroll_cleanup = scroll.clone();
            move || {
                scroll_cleanup.borrow_mut().stop();
                let _ = overlay.remove_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
                let _ = overlay.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = overlay.remove_event_listener_with_callback(
                    "click",
                    click_cb.as_ref().unchecked_ref(),
                );
                let _ = overlay.remove_event_listener_with_callback(
                    "touchstart",
                    touchstart_cb.as_ref().unchecked_ref(),
                );
                let _ = overlay.remove_event_listener_with_callback(
                    "touchmove",
                    touchmove_cb.as_ref().unchecked_ref(),
                );
                let _ = overlay.remove_event_listener_with_callback(
                    "touchend",
                    touchend_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "keydown",
                    keydown_cb.as_ref().unchecked_ref(),
                );
                let _ = window_clone.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                let _ = gl_canvas.remove_event_listener_with_callback(
                    "webglcontextlost",
                    contextlost_cb.as_ref().unchecked_ref(),
                );
                let _ = gl_canvas.remove_event_listener_with_callback(
                    "webglcontextrestored",
                    contextrestored_cb.as_ref().unchecked_ref(),
                );
                if let Some(id) = *raf_id.borrow() {
                    let _ = window_clone.cancel_animation_frame(id);
                }
                let _keep_alive = (
                    &wheel_cb,
                    &keydown_cb,
                    &mousemove_cb,
                    &click_cb,
                    &touchstart_cb,
                    &touchmove_cb,
                    &touchend_cb,
                    &resize_cb,
                    &contextlost_cb,
                    &contextrestored_cb,
                    &nav_sub,
                );
            }
        });
    }

    // Leaving a project runs the mirrored portal transition back out.
    let on_exit_project = {
        let portals = portals.clone();
        let nav = nav.clone();
        let camera = camera.clone();
        let rig = rig.clone();
        Callback::from(move |_: ()| {
            if portals.borrow().state() != PortalState::Open {
                return;
            }
            let waypoint = CAMERA_PATH[camera.borrow().current_zone_index()];
            nav.borrow_mut().enter_transition_mode();
            let nav_done = nav.clone();
            let rig_update = rig.clone();
            let started = portals.borrow_mut().exit_portal(
                waypoint.position,
                waypoint.target,
                move |pos, target| rig_update.borrow_mut().set_pose(pos, target),
                Some(Box::new(move || {
                    let mut nav = nav_done.borrow_mut();
                    nav.enter_exploration_mode();
                    nav.exit_transition_mode();
                })),
            );
            if !started {
                nav.borrow_mut().exit_transition_mode();
            }
        })
    };

    let use_fallback = {
        let on_use_fallback = props.on_use_fallback.clone();
        Callback::from(move |_: MouseEvent| on_use_fallback.emit(()))
    };

    html! {
        <div style="position:fixed; inset:0; overflow:hidden; background:#05070c;">
            <canvas ref={gl_canvas_ref} style="position:absolute; inset:0;" />
            <canvas ref={overlay_ref} style="position:absolute; inset:0;" />
            <button
                onclick={use_fallback}
                style="position:absolute; top:12px; right:12px; z-index:4; background:#161b22; color:#c9d1d9; border:1px solid #2f3641; padding:6px 12px; border-radius:6px; cursor:pointer;"
            >{ "Text version" }</button>
            if *context_lost {
                <div style="position:absolute; top:0; left:0; right:0; z-index:5; background:#b33; color:#fff; text-align:center; padding:8px; font-family:sans-serif;">
                    { "Graphics context lost - attempting to recover..." }
                </div>
            }
            <ScrollIndicator progress={*progress} zone_label={(*zone_label).clone()} />
            if let Some(project) = (*active_project).clone() {
                <ProjectOverlay {project} on_exit={on_exit_project} />
            }
        </div>
    }
}
