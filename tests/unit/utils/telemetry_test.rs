// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use keyword_scout::config::settings::{LogFormat, LoggingSettings};
    use keyword_scout::utils::telemetry;

    #[test]
    fn test_telemetry_initialization_is_idempotent() {
        let pretty = LoggingSettings {
            level: "info,keyword_scout=debug".to_string(),
            format: LogFormat::Pretty,
        };
        let json = LoggingSettings {
            level: "warn".to_string(),
            format: LogFormat::Json,
        };

        telemetry::init_telemetry(&pretty);
        // 第二次初始化保留已安装的订阅者
        telemetry::init_telemetry(&json);

        tracing::info!(domain = "example.com", index = 0, "(1/1) example.com -> NO");
        tracing::debug!("debug output");
    }
}
