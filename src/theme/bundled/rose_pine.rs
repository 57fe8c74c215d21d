//! Rosé Pine - All natural pine, faux fur and a bit of soho vibes

pub const THEME: &str = r##"# Rosé Pine theme for anthropic-spy
# All natural pine, faux fur and a bit of soho vibes

[meta]
name = "Rosé Pine"
version = 1
author = "iTerm2-Color-Schemes"

[ui]
background = "#191724"
foreground = "#e0def4"
border = "#e0def4"
border_focused = "#f6c177"
title = "#ebbcba"
status_bar = "#e0def4"
selection_bg = "#403d52"
selection_fg = "#e0def4"

[events]
tool_call = "#9ccfd8"
tool_result_ok = "#31748f"
tool_result_fail = "#eb6f92"
request = "#9ccfd8"
response = "#c4a7e7"
error = "#eb6f92"
thinking = "#c4a7e7"
api_usage = "#e0def4"
headers = "#e0def4"
rate_limit = "#e0def4"
context_compact = "#f6c177"

[context_bar]
fill = "#31748f"
warn = "#f6c177"
danger = "#eb6f92"

[panels]
events = "#9ccfd8"
thinking = "#c4a7e7"
logs = "#31748f"

[vhs]
black = "#26233a"
red = "#eb6f92"
green = "#31748f"
yellow = "#f6c177"
blue = "#9ccfd8"
purple = "#c4a7e7"
cyan = "#ebbcba"
white = "#e0def4"
bright_black = "#6e6a86"
bright_red = "#eb6f92"
bright_green = "#31748f"
bright_yellow = "#f6c177"
bright_blue = "#9ccfd8"
bright_purple = "#c4a7e7"
bright_cyan = "#ebbcba"
bright_white = "#e0def4"
cursor = "#e0def4"
"##;
