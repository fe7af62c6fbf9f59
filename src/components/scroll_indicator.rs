use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ScrollIndicatorProps {
    pub progress: f64,
    pub zone_label: String,
}

/// Thin progress rail on the right edge plus the current zone name.
#[function_component(ScrollIndicator)]
pub fn scroll_indicator(props: &ScrollIndicatorProps) -> Html {
    let pct = (props.progress.clamp(0.0, 1.0) * 100.0).round();
    let fill_style = format!(
        "position:absolute; top:0; left:0; width:100%; height:{pct}%; background:#58a6ff; border-radius:3px;"
    );
    html! {
        <div style="position:absolute; right:18px; top:50%; transform:translateY(-50%); z-index:3; display:flex; flex-direction:column; align-items:center; gap:10px; font-family:sans-serif;">
            <div style="position:relative; width:6px; height:220px; background:#161b22; border:1px solid #2f3641; border-radius:3px;">
                <div style={fill_style} />
            </div>
            <span style="color:#c9d1d9; font-size:12px; writing-mode:vertical-rl;">
                { props.zone_label.clone() }
            </span>
        </div>
    }
}
