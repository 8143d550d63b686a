//! 程序入口：初始化日志、解析命令行并分派到各子命令

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::SubscriberBuilder;

use json_mapper::model::data_core::MapperState;
use json_mapper::model::document::{beautify, diagnose, minify};
use json_mapper::model::field_paths::{extract_all_fields, extract_leaf_fields};
use json_mapper::model::shadow_tree::DocumentTree;
use json_mapper::utils::clipboard::copy_to_clipboard;
use json_mapper::utils::fs::{read_text_file, report_output_path, write_text_file};
use json_mapper::vm::bridge::*;

#[derive(Parser)]
#[command(name = "json_mapper", version, about = "把源 JSON 文档的叶子字段映射到目标文档字段，并生成映射报告")]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 列出文档的字段路径
    Fields {
        /// JSON 文档路径
        file: PathBuf,
        /// 同时列出容器（对象/数组）路径并加标记
        #[arg(long)]
        all: bool,
        /// 以 JSON 格式输出
        #[arg(long)]
        json: bool,
    },
    /// 以可折叠树的形式打印文档
    Tree {
        /// JSON 文档路径
        file: PathBuf,
        /// 切换某个容器路径的展开状态（可重复）
        #[arg(long = "toggle", value_name = "PATH")]
        toggles: Vec<String>,
        /// 以 JSON 格式输出可见节点
        #[arg(long)]
        json: bool,
    },
    /// 应用字段映射并输出映射报告
    Map {
        /// 源文档路径（提供可映射的叶子字段）
        #[arg(long)]
        source: PathBuf,
        /// 目标文档路径（提供映射目标）
        #[arg(long)]
        target: PathBuf,
        /// 选择映射 SRC -> DST；再次选择当前目标即取消（可重复）
        #[arg(long = "map", value_name = "SRC=DST")]
        mappings: Vec<String>,
        /// 报告写入文件（若为目录则写入 field-mapping-plan.md）
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// 复制报告到系统剪贴板
        #[arg(long)]
        copy: bool,
    },
    /// 美化或压缩文档
    Format {
        /// JSON 文档路径
        file: PathBuf,
        /// 压缩为单行（默认美化）
        #[arg(long)]
        minify: bool,
        /// 直接改写原文件而不是打印
        #[arg(long)]
        in_place: bool,
    },
}

/// 读取文档；语法错误时给出解析诊断
fn read_document(p: &Path) -> Result<String> {
    let text = read_text_file(p).with_context(|| format!("读取文件失败: {}", p.display()))?;
    diagnose(&text).with_context(|| format!("{} 不是合法的 JSON", p.display()))?;
    Ok(text)
}

fn handle_fields(file: &Path, all: bool, json: bool) -> Result<()> {
    let text = read_document(file)?;
    if json {
        let out = if all {
            all_fields_json(&extract_all_fields(&text))?
        } else {
            leaf_fields_json(&extract_leaf_fields(&text))?
        };
        println!("{}", out);
        return Ok(());
    }
    let lines = if all {
        all_fields_lines(&extract_all_fields(&text))
    } else {
        extract_leaf_fields(&text)
    };
    tracing::info!("{}: {} 个字段", file.display(), lines.len());
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

fn handle_tree(file: &Path, toggles: &[String], json: bool) -> Result<()> {
    let text = read_document(file)?;
    let value = diagnose(&text)?.context("文档为空")?;
    let mut tree = DocumentTree::from_value(&value);
    for path in toggles {
        if tree.toggle(path).is_none() {
            tracing::warn!("不是可展开的节点: {:?}", path);
        }
    }
    if json {
        println!("{}", tree_json(&tree)?);
        return Ok(());
    }
    for line in tree.render() {
        println!("{}", line);
    }
    Ok(())
}

fn handle_map(
    source: &Path,
    target: &Path,
    mappings: &[String],
    output: Option<&Path>,
    copy: bool,
) -> Result<()> {
    let mut state = MapperState::default();
    state.set_source_text(read_document(source)?);
    state.set_target_text(read_document(target)?);

    for arg in mappings {
        let (src, dst) = parse_mapping_arg(arg)?;
        state
            .select(&src, &dst)
            .with_context(|| format!("无法应用映射: {}", arg))?;
    }

    for line in mapping_table_lines(&state) {
        eprintln!("{}", line);
    }

    let report = state.report();
    println!("{}", report);

    if let Some(out) = output {
        let path = report_output_path(out);
        write_text_file(&path, &report).with_context(|| format!("写入报告失败: {}", path.display()))?;
        tracing::info!("{} {}", STATUS_SAVED, path.display());
    }
    if copy {
        copy_to_clipboard(&report).context("复制报告失败")?;
        tracing::info!("{}", STATUS_COPIED);
    }
    Ok(())
}

fn handle_format(file: &Path, minify_output: bool, in_place: bool) -> Result<()> {
    let text = read_text_file(file)?;
    let formatted = (if minify_output { minify(&text) } else { beautify(&text) })
        .with_context(|| format!("{} 不是合法的 JSON", file.display()))?;
    if in_place {
        write_text_file(file, &formatted)?;
        tracing::info!("{}: {}", STATUS_FORMATTED, file.display());
    } else {
        println!("{}", formatted);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fields { file, all, json } => handle_fields(&file, all, json),
        Command::Tree {
            file,
            toggles,
            json,
        } => handle_tree(&file, &toggles, json),
        Command::Map {
            source,
            target,
            mappings,
            output,
            copy,
        } => handle_map(&source, &target, &mappings, output.as_deref(), copy),
        Command::Format {
            file,
            minify,
            in_place,
        } => handle_format(&file, minify, in_place),
    }
}

fn main() {
    let cli = Cli::parse();

    // 初始化日志输出（写到 stderr，不干扰报告输出）
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(e) = run(cli) {
        eprintln!("{}{:#}", STATUS_ERROR_PREFIX, e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_every_argument_has_help() {
        let cli = Cli::command();
        for sub in cli.get_subcommands() {
            assert!(sub.get_about().is_some(), "子命令缺少说明: {}", sub.get_name());
            for arg in sub.get_arguments() {
                let id = arg.get_id().as_str();
                if id == "help" || id == "version" {
                    continue;
                }
                assert!(arg.get_help().is_some(), "{} 的参数 {} 缺少说明", sub.get_name(), id);
            }
        }
    }

    #[test]
    fn test_parse_json_flags() {
        let cli = Cli::try_parse_from(["json_mapper", "fields", "a.json", "--all", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Fields { all: true, json: true, .. }));

        let cli = Cli::try_parse_from(["json_mapper", "tree", "a.json", "--toggle", "user", "--json"]).unwrap();
        match cli.command {
            Command::Tree { toggles, json, .. } => {
                assert_eq!(toggles, vec!["user"]);
                assert!(json);
            }
            _ => panic!("应解析为 tree 子命令"),
        }
    }
}
