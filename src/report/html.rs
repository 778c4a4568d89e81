//! # HTML 页面渲染
//!
//! 纯函数：由 (`ReportModel`, `RenderContext`, 已放置文件) 生成
//! `index.html` 与每条记录的详情页。所有文本都经过 HTML 转义。
//!
//! ## 页面
//! - 索引页：每个 collection 一行，puck 单元格按 `rowspan` 跨行；
//!   仅当 `csv_loaded` 时显示 Project / Staff Comments 列
//! - 详情页 `<puck>_<collection>_details.html`：晶胞、缩放壳层统计、
//!   screening、图像、相机图库、附属页面链接
//!
//! ## 依赖关系
//! - 被 `report/mod.rs` 调用
//! - 使用 `models/`, `report/placement.rs`

use super::placement::PlacedFiles;
use crate::models::{CellData, CollectionRecord, ImageSet, RenderContext, ReportModel, Shell};

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#222}\
table{border-collapse:collapse;margin-bottom:1.5em}\
th,td{border:1px solid #bbb;padding:4px 8px;text-align:left;vertical-align:top}\
th{background:#eef}\
td.puck{font-weight:bold;background:#f7f7f7}\
.gallery img{max-width:320px;margin:4px;border:1px solid #ccc}\
footer{margin-top:2em;color:#888;font-size:small}";

/// 详情页文件名
pub fn details_file_name(puck: &str, collection: &str) -> String {
    format!("{}_{}_details.html", puck, collection)
}

/// HTML 转义，同时适用于文本与带引号的属性值
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

fn fmt_num(value: Option<f64>, digits: usize) -> String {
    value
        .map(|v| format!("{:.*}", digits, v))
        .unwrap_or_default()
}

fn fmt_text(value: Option<&str>) -> String {
    value.map(escape_html).unwrap_or_default()
}

fn page(title: &str, body: &str, ctx: &RenderContext) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\
         <footer>Generated {generated}</footer>\n</body>\n</html>\n",
        title = escape_html(title),
        body = body,
        generated = ctx.generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// 渲染索引页
pub fn index_page(model: &ReportModel, ctx: &RenderContext) -> String {
    let mut body = format!("<h1>{}</h1>\n", escape_html(&ctx.report_title));
    body.push_str(&format!(
        "<p>{} pucks, {} collections</p>\n",
        model.pucks.len(),
        model.num_collections()
    ));

    body.push_str("<table>\n<tr><th>Puck</th><th>Collection</th><th>Screened</th>\
                   <th>Space Group</th><th>Resolution (Å)</th>");
    for key in CellData::KEYS {
        body.push_str(&format!("<th>{}</th>", key));
    }
    if ctx.csv_loaded {
        body.push_str("<th>Project</th><th>Staff Comments</th>");
    }
    body.push_str("</tr>\n");

    for group in &model.pucks {
        for (i, record) in group.collections.iter().enumerate() {
            body.push_str("<tr>");
            if i == 0 {
                body.push_str(&format!(
                    "<td class=\"puck\" rowspan=\"{}\">{}</td>",
                    group.collections.len(),
                    escape_html(&group.puck)
                ));
            }
            body.push_str(&index_cells(&group.puck, record, ctx.csv_loaded));
            body.push_str("</tr>\n");
        }
    }
    body.push_str("</table>\n");

    page(&ctx.report_title, &body, ctx)
}

fn index_cells(puck: &str, record: &CollectionRecord, csv_loaded: bool) -> String {
    let mut cells = format!(
        "<td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td>",
        escape_html(&details_file_name(puck, &record.collection)),
        escape_html(&record.collection),
        if record.screen { "Yes" } else { "No" },
        fmt_text(record.space_group()),
        fmt_num(record.resolution(), 2),
    );
    let cell = record.cell();
    for key in CellData::KEYS {
        cells.push_str(&format!(
            "<td>{}</td>",
            fmt_num(cell.and_then(|c| c.get(key)), 2)
        ));
    }
    if csv_loaded {
        cells.push_str(&format!(
            "<td>{}</td><td>{}</td>",
            fmt_text(record.project.as_deref()),
            fmt_text(record.staff_comments.as_deref())
        ));
    }
    cells
}

/// 渲染单条记录的详情页
pub fn details_page(
    puck: &str,
    record: &CollectionRecord,
    placed: &PlacedFiles,
    ctx: &RenderContext,
) -> String {
    let title = format!("{} / {}", puck, record.collection);
    let mut body = format!(
        "<p><a href=\"index.html\">&larr; {}</a></p>\n<h1>{}</h1>\n",
        escape_html(&ctx.report_title),
        escape_html(&title)
    );
    body.push_str(&format!(
        "<p>Path: <code>{}</code></p>\n",
        escape_html(&record.collection_path.display().to_string())
    ));
    if ctx.csv_loaded {
        body.push_str(&format!(
            "<p>Project: {}<br>Staff Comments: {}</p>\n",
            fmt_text(record.project.as_deref()),
            fmt_text(record.staff_comments.as_deref())
        ));
    }

    body.push_str(&processing_section(record));
    body.push_str(&screening_section(record));
    body.push_str(&images_section(record));
    body.push_str(&links_section(placed));
    body.push_str(&gallery_section(placed));

    page(&title, &body, ctx)
}

fn cell_table(cell: &CellData) -> String {
    let mut html = String::from("<table>\n<tr>");
    for key in CellData::KEYS {
        html.push_str(&format!("<th>{}</th>", key));
    }
    html.push_str("</tr>\n<tr>");
    for key in CellData::KEYS {
        html.push_str(&format!("<td>{}</td>", fmt_num(cell.get(key), 2)));
    }
    html.push_str("</tr>\n</table>\n");
    html
}

fn processing_section(record: &CollectionRecord) -> String {
    let Some(processing) = &record.processing else {
        return "<h2>Processing</h2>\n<p>No processing results.</p>\n".to_string();
    };
    let xml = &processing.autoproc_xml;

    let mut html = String::from("<h2>Processing</h2>\n");
    html.push_str(&format!(
        "<p>Space group: {}<br>Wavelength (Å): {}</p>\n",
        fmt_text(xml.space_group.as_deref()),
        fmt_num(xml.wavelength, 4)
    ));
    if !xml.cell_data.is_empty() {
        html.push_str(&cell_table(&xml.cell_data));
    }

    if xml.scale_data.is_empty() {
        html.push_str("<p>No scaling statistics.</p>\n");
        return html;
    }

    html.push_str("<h3>Scaling Statistics</h3>\n<table>\n<tr><th></th>");
    for shell in Shell::ALL {
        html.push_str(&format!("<th>{}</th>", shell.label()));
    }
    html.push_str("</tr>\n");

    let shells: Vec<_> = Shell::ALL
        .iter()
        .map(|s| xml.scale_data.shell(*s).map(|stats| stats.rows()))
        .collect();
    let labels = crate::models::ShellStatistics::default().rows();
    for (row, (label, _)) in labels.iter().enumerate() {
        html.push_str(&format!("<tr><th>{}</th>", escape_html(label)));
        for shell in &shells {
            let value = shell.as_ref().and_then(|rows| rows[row].1);
            html.push_str(&format!("<td>{}</td>", fmt_num(value, 3)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

fn screening_section(record: &CollectionRecord) -> String {
    let Some(screening) = &record.screening else {
        return String::new();
    };

    let mut html = String::from("<h2>Screening</h2>\n<table>\n");
    let indexing = match screening.indexing_success {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "",
    };
    let rows = [
        ("Program", fmt_text(screening.program.as_deref())),
        ("Comments", fmt_text(screening.comments.as_deref())),
        ("Indexing Success", indexing.to_string()),
        ("Space Group", fmt_text(screening.space_group.as_deref())),
        ("Mosaicity", fmt_num(screening.mosaicity, 3)),
        ("Ranking Resolution (Å)", fmt_num(screening.ranking_resolution, 2)),
        ("Spots Found", fmt_num(screening.num_spots_found, 0)),
    ];
    for (label, value) in rows {
        html.push_str(&format!("<tr><th>{}</th><td>{}</td></tr>\n", label, value));
    }
    html.push_str("</table>\n");
    if !screening.cell_data.is_empty() {
        html.push_str(&cell_table(&screening.cell_data));
    }
    html
}

fn image_line(label: &str, set: &ImageSet) -> String {
    format!(
        "<li>{}: {} images in <code>{}</code></li>\n",
        label,
        set.num_images,
        escape_html(&set.path.display().to_string())
    )
}

fn images_section(record: &CollectionRecord) -> String {
    let files = &record.files;
    let mut items = String::new();
    if let Some(set) = &files.images {
        items.push_str(&image_line("Data", set));
    }
    if let Some(set) = &files.screen_images {
        items.push_str(&image_line("Screening", set));
    }
    for diff in &files.diff_center {
        items.push_str(&format!(
            "<li>{}: {} images</li>\n",
            escape_html(&diff.name),
            diff.num_images
        ));
    }

    if items.is_empty() {
        String::new()
    } else {
        format!("<h2>Images</h2>\n<ul>\n{}</ul>\n", items)
    }
}

fn links_section(placed: &PlacedFiles) -> String {
    let links: Vec<String> = [
        ("autoPROC Summary", &placed.summary),
        ("Diff-center ZX Result", &placed.zx_result),
        ("Diff-center ZY Result", &placed.zy_result),
    ]
    .into_iter()
    .filter_map(|(label, href)| {
        href.as_ref()
            .map(|h| format!("<li><a href=\"{}\">{}</a></li>\n", escape_html(h), label))
    })
    .collect();

    if links.is_empty() {
        String::new()
    } else {
        format!("<h2>Links</h2>\n<ul>\n{}</ul>\n", links.concat())
    }
}

fn gallery_section(placed: &PlacedFiles) -> String {
    if placed.camera.is_empty() {
        return String::new();
    }
    let images: String = placed
        .camera
        .iter()
        .map(|src| {
            let src = escape_html(src);
            format!("<a href=\"{0}\"><img src=\"{0}\" alt=\"{0}\"></a>\n", src)
        })
        .collect();
    format!("<h2>Camera</h2>\n<div class=\"gallery\">\n{}</div>\n", images)
}
