//! # Email Service ライブラリ
//!
//! テンプレートからメール本文を生成し、トランザクションメール API に送信する。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーターとミドルウェアの構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: HTTP 境界のエラーとレスポンス変換
//! - `handler`: HTTP ハンドラ
//! - `usecase`: テンプレートレンダリングと送信の統合

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
