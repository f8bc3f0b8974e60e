#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// A four-cell notebook the way Jupyter writes it:
/// 1. markdown title
/// 2. code with a long stdout stream and an error
/// 3. code with a PNG figure and a dataframe table (8 rows)
/// 4. raw cell
pub fn sample_notebook() -> Value {
    let mut rows = String::new();
    for i in 0..8 {
        rows.push_str(&format!(
            "    <tr>\n      <th>{i}</th>\n      <td>item{i}</td>\n      <td>{}</td>\n    </tr>\n",
            i * 3
        ));
    }
    let table = format!(
        "<div>\n<table border=\"1\" class=\"dataframe\">\n  <thead>\n    <tr style=\"text-align: right;\">\n      <th>name</th>\n      <th>qty</th>\n    </tr>\n  </thead>\n  <tbody>\n{rows}  </tbody>\n</table>\n</div>"
    );

    json!({
        "cells": [
            {
                "cell_type": "markdown",
                "id": "c0ffee01",
                "metadata": {"tags": ["intro"]},
                "source": ["# Sales report\n", "\n", "Quarterly numbers."]
            },
            {
                "cell_type": "code",
                "execution_count": 1,
                "id": "c0ffee02",
                "metadata": {"scrolled": true},
                "outputs": [
                    {"name": "stdout", "output_type": "stream", "text": ["x".repeat(800)]},
                    {
                        "ename": "ValueError",
                        "evalue": "bad value",
                        "output_type": "error",
                        "traceback": ["Traceback (most recent call last)", "ValueError: bad value"]
                    }
                ],
                "source": ["for i in range(800):\n", "    print('x', end='')"]
            },
            {
                "cell_type": "code",
                "execution_count": 2,
                "id": "c0ffee03",
                "metadata": {},
                "outputs": [
                    {
                        "data": {"image/png": "iVBORw0KGgoAAAANSUhEUg==", "text/plain": ["<Figure size 640x480 with 1 Axes>"]},
                        "metadata": {},
                        "output_type": "display_data"
                    },
                    {
                        "data": {"text/html": [table], "text/plain": ["   name  qty\n", "0  item0    0"]},
                        "execution_count": 2,
                        "metadata": {},
                        "output_type": "execute_result"
                    }
                ],
                "source": "df.plot()\ndf"
            },
            {
                "cell_type": "raw",
                "id": "c0ffee04",
                "metadata": {},
                "source": "raw passthrough"
            }
        ],
        "metadata": {
            "kernelspec": {"display_name": "Python 3", "language": "python", "name": "python3"}
        },
        "nbformat": 4,
        "nbformat_minor": 5
    })
}

pub fn two_code_cells() -> Value {
    json!({
        "cells": [
            {
                "cell_type": "code",
                "execution_count": 1,
                "metadata": {},
                "outputs": [],
                "source": "x=1"
            },
            {
                "cell_type": "code",
                "execution_count": 2,
                "metadata": {},
                "outputs": [{"name": "stdout", "output_type": "stream", "text": "1\n"}],
                "source": "print(x)"
            }
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 4
    })
}

pub struct Scratch {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Scratch {
    pub fn path_str(&self) -> &str {
        self.path.to_str().expect("utf-8 temp path")
    }

    pub fn read_json(&self) -> Value {
        serde_json::from_str(&self.read_raw()).expect("notebook json")
    }

    pub fn read_raw(&self) -> String {
        std::fs::read_to_string(&self.path).expect("read notebook")
    }
}

pub fn write_notebook(value: &Value) -> Scratch {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("notebook.ipynb");
    write_to(&path, value);
    Scratch { _dir: dir, path }
}

pub fn write_to(path: &Path, value: &Value) {
    let raw = serde_json::to_string_pretty(value).expect("serialize fixture");
    std::fs::write(path, raw).expect("write fixture");
}
