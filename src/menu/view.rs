use crate::models::{ChannelView, Source};

pub fn render_main_menu() -> String {
    [
        "",
        "--- MENU ---",
        "1. Enable/disable individual channels",
        "2. Enable all channels",
        "3. Disable all channels",
        "4. Change a channel's source",
        "5. Write filtered playlist",
        "q. Quit",
        "",
    ]
    .join("\n")
}

pub fn render_channel_list(views: &[ChannelView]) -> String {
    views
        .iter()
        .enumerate()
        .map(|(i, view)| {
            let state = if view.channel.enabled {
                "enabled"
            } else {
                "disabled"
            };
            format!("{}. {} [{}]\n", i + 1, view.channel.id, state)
        })
        .collect()
}

pub fn render_enabled_channels(views: &[&ChannelView]) -> String {
    let mut out = String::from("\nEnabled channels:\n");
    for (i, view) in views.iter().enumerate() {
        let current = view
            .active_source()
            .map(source_label)
            .unwrap_or("no source selected");
        out.push_str(&format!(
            "{}. {} (current source: {})\n",
            i + 1,
            view.channel.id,
            current
        ));
    }
    out
}

pub fn render_sources(view: &ChannelView) -> String {
    let current_url = view
        .active_source()
        .map(|s| s.url.as_str())
        .unwrap_or("none");
    let mut out = format!(
        "Current URL for {}: {}\n\nSources for {}:\n",
        view.channel.id, current_url, view.channel.id
    );
    for (i, source) in view.sources.iter().enumerate() {
        let marker = if source.active { " (current)" } else { "" };
        out.push_str(&format!(
            "{}. {} {}{}\n",
            i + 1,
            source_label(source),
            source.url,
            marker
        ));
    }
    out
}

fn source_label(source: &Source) -> &str {
    if source.display_name.is_empty() {
        &source.channel_id
    } else {
        &source.display_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Channel;

    fn cnn() -> ChannelView {
        ChannelView {
            channel: Channel {
                id: "cnn".into(),
                enabled: true,
            },
            sources: vec![
                Source {
                    id: 1,
                    channel_id: "cnn".into(),
                    display_name: "CNN HD".into(),
                    raw_header: String::new(),
                    url: "http://a/1".into(),
                    active: false,
                },
                Source {
                    id: 2,
                    channel_id: "cnn".into(),
                    display_name: String::new(),
                    raw_header: String::new(),
                    url: "http://a/2".into(),
                    active: true,
                },
            ],
        }
    }

    #[test]
    fn channel_list_shows_state() {
        let mut off = cnn();
        off.channel.id = "bbc".into();
        off.channel.enabled = false;
        assert_eq!(
            render_channel_list(&[cnn(), off]),
            "1. cnn [enabled]\n2. bbc [disabled]\n"
        );
    }

    #[test]
    fn sources_mark_the_current_one() {
        let rendered = render_sources(&cnn());
        assert!(rendered.starts_with("Current URL for cnn: http://a/2\n"));
        assert!(rendered.contains("1. CNN HD http://a/1\n"));
        assert!(rendered.contains("2. cnn http://a/2 (current)\n"));
    }

    #[test]
    fn sources_render_in_full() {
        assert_eq!(
            render_sources(&cnn()),
            "Current URL for cnn: http://a/2\n\nSources for cnn:\n\
             1. CNN HD http://a/1\n\
             2. cnn http://a/2 (current)\n"
        );
    }

    #[test]
    fn enabled_list_renders_in_full() {
        let view = cnn();
        let mut none = cnn();
        none.channel.id = "bbc".into();
        none.sources.clear();
        assert_eq!(
            render_enabled_channels(&[&view, &none]),
            "\nEnabled channels:\n\
             1. cnn (current source: cnn)\n\
             2. bbc (current source: no source selected)\n"
        );
    }

    #[test]
    fn enabled_list_names_current_source() {
        let view = cnn();
        let rendered = render_enabled_channels(&[&view]);
        assert!(rendered.contains("1. cnn (current source: cnn)"));
    }
}
