use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        self,
        format::{Format, FormatEvent, FormatFields, Writer},
        FmtContext, FormattedFields,
    },
    registry::LookupSpan,
};

/// Span field whose value tags every event recorded under a token lookup.
const SYMBOL_FIELD: &str = "symbol";

/// Event formatter that indents each line by the depth of its span scope and prefixes
/// events inside a token lookup with that token's symbol.
pub struct PrettyFormatter {
    inner: Format,
}

impl PrettyFormatter {
    pub fn new(ansi: bool) -> Self {
        Self {
            inner: fmt::format()
                .with_ansi(ansi)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .with_level(true)
                .with_source_location(false),
        }
    }
}

fn indent(depth: usize) -> String {
    let mut prefix = "  ".repeat(depth / 2);
    prefix.push_str(if depth > 0 { "└─" } else { "  " });
    prefix
}

fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain
}

/// Value of `name` in a span's rendered `key=value` field list.
fn field_value(fields: &str, name: &str) -> Option<String> {
    strip_ansi(fields).split_whitespace().find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.trim_matches('"').to_string())
    })
}

/// Symbol of the innermost enclosing span that records one.
fn scope_symbol<S, N>(ctx: &FmtContext<'_, S, N>) -> Option<String>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    ctx.event_scope()?.find_map(|span| {
        let extensions = span.extensions();
        let fields = extensions.get::<FormattedFields<N>>()?;
        field_value(&fields.fields, SYMBOL_FIELD)
    })
}

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let depth = ctx.event_scope().map(|scope| scope.count()).unwrap_or(0);

        write!(writer, "{}", indent(depth))?;
        if let Some(symbol) = scope_symbol(ctx) {
            write!(writer, "[{}] ", symbol)?;
        }

        self.inner.format_event(ctx, writer, event)
    }
}
