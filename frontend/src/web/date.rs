//! 时间工具模块
//!
//! 封装 js_sys::Date。后端的日期以字符串透传
//! （ISO 8601 或 YYYY-MM-DD），仅在展示时格式化。

use wasm_bindgen::JsValue;

/// 当前日期 (YYYY-MM-DD)，用于日志表单的默认值
pub fn today_iso() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    iso.split('T').next().unwrap_or_default().to_string()
}

/// 当前时刻的完整 ISO 8601 时间戳
pub fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}

/// 将后端日期字符串格式化为本地化展示形式
///
/// 解析失败时原样返回，绝不因坏数据中断渲染。
pub fn format_display(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let ms = js_sys::Date::parse(raw);
    if ms.is_nan() {
        return raw.to_string();
    }
    let date = js_sys::Date::new(&JsValue::from_f64(ms));
    date.to_locale_date_string("en-US", &JsValue::UNDEFINED)
        .into()
}
