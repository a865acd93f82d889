use lsb_bridge::StegoError;
use lsb_bridge::constants::{HEADER_LEN, TAG_BINARY, TAG_TEXT};
use lsb_bridge::frame::{FrameHeader, Message, MessageKind, deserialize, serialize};

/// 验证帧的字节布局：标签、大端序长度、原样负载
#[test]
fn test_serialize_layout() -> anyhow::Result<()> {
    let frame = serialize(&Message::text("hi"))?;
    assert_eq!(frame, vec![TAG_TEXT, 0, 0, 0, 2, b'h', b'i']);

    let frame = serialize(&Message::binary(vec![0xFF; 258]))?;
    assert_eq!(&frame[..HEADER_LEN], &[TAG_BINARY, 0, 0, 1, 2]);
    assert_eq!(frame.len(), HEADER_LEN + 258);
    Ok(())
}

/// 验证空负载只产生帧头
#[test]
fn test_empty_payload() -> anyhow::Result<()> {
    let message = Message::binary(Vec::new());
    let frame = serialize(&message)?;
    assert_eq!(frame.len(), HEADER_LEN);
    assert_eq!(deserialize(&frame)?, message);
    Ok(())
}

/// 验证解析时忽略声明长度之后的尾部字节
#[test]
fn test_deserialize_ignores_trailing_bytes() -> anyhow::Result<()> {
    let mut frame = serialize(&Message::text("secret"))?;
    frame.extend_from_slice(b"garbage after the frame");

    let message = deserialize(&frame)?;
    assert_eq!(message.kind(), MessageKind::Text);
    assert_eq!(message.as_text()?, "secret");
    Ok(())
}

/// 验证未知标签被拒绝
#[test]
fn test_unknown_tag_is_malformed() {
    let result = deserialize(&[0x00, 0, 0, 0, 0]);
    assert!(matches!(result, Err(StegoError::MalformedFrame(_))));
}

/// 验证负载短于帧头声明的长度时被拒绝
#[test]
fn test_truncated_payload_is_malformed() {
    let result = deserialize(&[TAG_BINARY, 0, 0, 0, 4, 1, 2, 3]);
    match result {
        Err(StegoError::MalformedFrame(reason)) => assert!(reason.contains("4 payload bytes")),
        other => panic!("expected MalformedFrame, got {other:?}"),
    }
}

/// 验证不完整的帧头被拒绝
#[test]
fn test_short_header_is_malformed() {
    assert!(matches!(
        FrameHeader::decode(&[TAG_TEXT, 0, 0]),
        Err(StegoError::MalformedFrame(_))
    ));
}

/// 验证文本解释：非 UTF-8 负载与二进制消息都不能当作文本
#[test]
fn test_as_text() {
    let invalid = Message::new(MessageKind::Text, vec![0xC3, 0x28]);
    assert!(matches!(invalid.as_text(), Err(StegoError::MalformedFrame(_))));

    let binary = Message::binary(b"plain".to_vec());
    assert!(binary.as_text().is_err());

    assert_eq!(Message::text("你好").as_text(), Ok("你好"));
}

/// 验证宿主类型名与标签的对应关系
#[test]
fn test_kind_names_and_tags() {
    for kind in [MessageKind::Text, MessageKind::Binary] {
        assert_eq!(MessageKind::from_name(kind.name()), Ok(kind));
        assert_eq!(MessageKind::from_tag(kind.tag()), Ok(kind));
    }
    assert!(MessageKind::from_name("image").is_err());
}
